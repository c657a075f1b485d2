//! Access, mask and tokenization policies.

use super::{insert_opt, Call};
use crate::error::CliError;
use clap::{ArgAction, Args};
use serde_json::{json, Map, Value};
use vault_client::{Route, VaultRequest};

/// Separator between DN and display name in `--ad-group`.
pub const AD_GROUP_SEPARATOR: &str = "||";

/// Flags of `create-access-policy`.
#[derive(Args, Debug, Clone)]
pub struct CreateAccessPolicyArgs {
    /// Name of the Policy
    #[arg(short = 'n', long)]
    pub name: String,

    /// Role of the user
    #[arg(short = 'r', long)]
    pub role: String,

    /// Short description for the Policy
    #[arg(short = 'd', long)]
    pub description: Option<String>,

    /// Tokenization permissions for users of this policy. This option is repeatable
    #[arg(short = 'p', long = "tokenization_permissions", required = true)]
    pub tokenization_permissions: Vec<String>,

    /// Local user name of users to be added as principals. This option is repeatable
    #[arg(short = 'l', long = "local-user")]
    pub local_users: Vec<String>,

    /// UPN of AD users to be added as principals. This option is repeatable
    #[arg(short = 'u', long = "ad-upn")]
    pub ad_upns: Vec<String>,

    /// Logon Name of AD users to be added as principals. This option is repeatable
    #[arg(short = 'L', long = "ad-logon-name")]
    pub ad_logon_names: Vec<String>,

    /// || separated string containing DN & display name of AD groups to be added as principals
    #[arg(short = 'g', long = "ad-group")]
    pub ad_groups: Vec<String>,

    /// Tag key to associate with the Policy. This option is repeatable
    #[arg(short = 't', long = "tagkey")]
    pub tag_keys: Vec<String>,

    /// Tag value to associate with the Policy. This option is repeatable
    #[arg(short = 'v', long = "tagvalue")]
    pub tag_values: Vec<String>,
}

impl CreateAccessPolicyArgs {
    /// POST to `CreatePolicy/`.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::InvalidInput`] for a malformed `--ad-group` or
    /// unpaired tag flags.
    pub fn call(self) -> Result<Call, CliError> {
        let principals = self.principals()?;
        let tags = self.tags()?;

        let mut body = Map::new();
        body.insert("name".into(), Value::String(self.name));
        body.insert("role".into(), Value::String(self.role));
        body.insert(
            "tokenization_permissions".into(),
            json!(self.tokenization_permissions),
        );
        insert_opt(&mut body, "desc", self.description);
        if let Some(principals) = principals {
            body.insert("principals".into(), Value::Array(principals));
        }
        if let Some(tags) = tags {
            body.insert("tags".into(), Value::Object(tags));
        }

        Ok(Call::new(VaultRequest::post(
            Route::action(["CreatePolicy"]),
            Value::Object(body),
        )))
    }

    fn principals(&self) -> Result<Option<Vec<Value>>, CliError> {
        if self.local_users.is_empty()
            && self.ad_upns.is_empty()
            && self.ad_logon_names.is_empty()
            && self.ad_groups.is_empty()
        {
            return Ok(None);
        }

        let mut principals: Vec<Value> = Vec::new();
        principals.extend(
            self.local_users
                .iter()
                .map(|u| json!({ "local_user": { "username": u } })),
        );
        principals.extend(self.ad_upns.iter().map(|u| json!({ "ad_user": { "upn": u } })));
        principals.extend(
            self.ad_logon_names
                .iter()
                .map(|n| json!({ "ad_user": { "logon_name": n } })),
        );
        for group in &self.ad_groups {
            let (dn, display_name) = parse_ad_group(group)?;
            principals.push(json!({ "ad_group": { "dn": dn, "display_name": display_name } }));
        }
        Ok(Some(principals))
    }

    fn tags(&self) -> Result<Option<Map<String, Value>>, CliError> {
        match (self.tag_keys.is_empty(), self.tag_values.is_empty()) {
            (true, true) => return Ok(None),
            (false, false) => {}
            _ => {
                return Err(CliError::invalid_input(
                    "Please provide both tag key & values",
                ))
            }
        }
        if self.tag_keys.len() != self.tag_values.len() {
            return Err(CliError::invalid_input(
                "Please provide equal number of tag keys & values",
            ));
        }

        let tags = self
            .tag_keys
            .iter()
            .zip(&self.tag_values)
            .map(|(key, value)| (key.clone(), tag_value(value)))
            .collect();
        Ok(Some(tags))
    }
}

/// Split `"dn || display name"` into trimmed parts.
fn parse_ad_group(raw: &str) -> Result<(&str, &str), CliError> {
    let parts: Vec<&str> = raw.split(AD_GROUP_SEPARATOR).map(str::trim).collect();
    match parts.as_slice() {
        [dn, display_name] => Ok((*dn, *display_name)),
        _ => Err(CliError::invalid_input(format!(
            "Invalid ad-group argument: {raw}"
        ))),
    }
}

/// JSON objects are embedded as objects, anything else as a string.
fn tag_value(raw: &str) -> Value {
    match serde_json::from_str::<Value>(raw) {
        Ok(value @ Value::Object(_)) => value,
        _ => Value::String(raw.to_string()),
    }
}

/// Flags of `create-mask-policy`.
#[derive(Args, Debug, Clone)]
pub struct CreateMaskPolicyArgs {
    /// Name of the mask policy
    #[arg(short = 'n', long)]
    pub name: String,

    /// Description
    #[arg(short = 'd', long)]
    pub description: Option<String>,

    /// Number of leading characters left unmasked
    #[arg(short = 'P', long = "preservedPrefixLength", default_value_t = 0)]
    pub preserved_prefix_length: i64,

    /// Number of trailing characters left unmasked
    #[arg(short = 'S', long = "preservedSuffixLength", default_value_t = 0)]
    pub preserved_suffix_length: i64,

    /// Character set of the data
    #[arg(short = 'c', long)]
    pub charset: String,

    /// Create a new policy
    #[arg(
        short = 'N',
        long = "new",
        action = ArgAction::Set,
        num_args = 0..=1,
        default_value_t = true,
        default_missing_value = "true"
    )]
    pub is_new: bool,

    /// Masking character
    #[arg(short = 'm', long = "maskChar", default_value = "#")]
    pub mask_char: String,
}

impl CreateMaskPolicyArgs {
    /// POST to `CreateMaskPolicy/`.
    #[must_use]
    pub fn call(self) -> Call {
        let note = format!("Masking policy successfully created: {}", self.name);
        let mut body = Map::new();
        body.insert("name".into(), Value::String(self.name));
        insert_opt(&mut body, "description", self.description);
        body.insert("isNew".into(), Value::Bool(self.is_new));
        body.insert("preservedPrefixLength".into(), json!(self.preserved_prefix_length));
        body.insert("preservedSuffixLength".into(), json!(self.preserved_suffix_length));
        body.insert("charset".into(), Value::String(self.charset));
        body.insert("maskChar".into(), Value::String(self.mask_char));
        Call::new(VaultRequest::post(
            Route::action(["CreateMaskPolicy"]),
            Value::Object(body),
        ))
        .with_note(note)
    }
}

/// Flags of `create-tokenization-policy`.
#[derive(Args, Debug, Clone)]
pub struct CreateTokenizationPolicyArgs {
    /// Key GUID used by the policy
    #[arg(short = 'k', long = "keyGuid")]
    pub key_guid: String,

    /// Name of the tokenization policy
    #[arg(short = 'n', long)]
    pub name: String,

    /// Description
    #[arg(short = 'd', long)]
    pub description: Option<String>,

    /// Create a new policy
    #[arg(
        short = 'N',
        long = "new",
        action = ArgAction::Set,
        num_args = 0..=1,
        default_value_t = true,
        default_missing_value = "true"
    )]
    pub is_new: bool,

    /// Number of leading characters kept in the token
    #[arg(short = 'P', long = "preservedPrefixLength", default_value_t = 0)]
    pub preserved_prefix_length: i64,

    /// Number of trailing characters kept in the token
    #[arg(short = 'S', long = "preservedSuffixLength", default_value_t = 0)]
    pub preserved_suffix_length: i64,

    /// Character set of the data
    #[arg(short = 'c', long)]
    pub charset: String,

    /// Character set option. This option is repeatable
    #[arg(short = 'o', long = "charsetOption")]
    pub charset_options: Vec<String>,
}

impl CreateTokenizationPolicyArgs {
    /// POST to `CreateTokenPolicy/`.
    #[must_use]
    pub fn call(self) -> Call {
        let note = format!("Tokenization policy successfully created: {}", self.name);
        let mut body = Map::new();
        body.insert("name".into(), Value::String(self.name));
        insert_opt(&mut body, "description", self.description);
        body.insert("keyGuid".into(), Value::String(self.key_guid));
        body.insert("preservedPrefixLength".into(), json!(self.preserved_prefix_length));
        body.insert("preservedSuffixLength".into(), json!(self.preserved_suffix_length));
        body.insert("isNew".into(), Value::Bool(self.is_new));
        body.insert("charset".into(), Value::String(self.charset));
        body.insert("charsetOption".into(), json!(self.charset_options));
        Call::new(VaultRequest::post(
            Route::action(["CreateTokenPolicy"]),
            Value::Object(body),
        ))
        .with_note(note)
    }
}

/// Single `--name` flag.
#[derive(Args, Debug, Clone)]
pub struct PolicyNameArgs {
    /// Name of the policy
    #[arg(short = 'n', long)]
    pub name: String,
}

impl PolicyNameArgs {
    /// GET `action/{name}/`.
    #[must_use]
    pub fn call(self, action: &str) -> Call {
        Call::new(VaultRequest::get(Route::action([action.to_string(), self.name])))
    }
}

/// Filters of the policy listings.
#[derive(Args, Debug, Clone)]
pub struct ListPoliciesArgs {
    /// Name Filter
    #[arg(short = 'n', long = "nameFilter", default_value = "")]
    pub name_filter: String,

    /// Offset
    #[arg(short = 'o', long, default_value = "")]
    pub offset: String,

    /// Limit
    #[arg(short = 'l', long, default_value = "")]
    pub limit: String,

    /// True if you want count information
    #[arg(short = 'c', long, default_value = "")]
    pub counts: String,

    /// Sort
    #[arg(short = 's', long, default_value = "")]
    pub sort: String,
}

impl ListPoliciesArgs {
    /// GET `action` with the non-empty filters as query.
    #[must_use]
    pub fn call(self, action: &str) -> Call {
        let route = Route::bare([action])
            .query_non_empty("name", &self.name_filter)
            .query_non_empty("_offset", &self.offset)
            .query_non_empty("_counts", &self.counts)
            .query_non_empty("_limit", &self.limit)
            .query_non_empty("_ordering", &self.sort);
        Call::new(VaultRequest::get(route))
    }
}

//! Key lifecycle commands.

use super::{insert_opt, Call, Invocation};
use clap::Args;
use serde_json::{json, Map, Value};
use std::path::PathBuf;
use vault_client::{FormField, Route, VaultRequest};

/// Flags of `create-key`.
#[derive(Args, Debug, Clone)]
pub struct CreateKeyArgs {
    /// Keyset GUID
    #[arg(short = 'k', long = "keyset_guid")]
    pub keyset_guid: Option<String>,

    /// Key name
    #[arg(short = 'n', long)]
    pub name: String,

    /// Key description
    #[arg(short = 'd', long)]
    pub description: Option<String>,

    /// Cipher, e.g. AES-256
    #[arg(short = 'c', long)]
    pub cipher: String,
}

impl CreateKeyArgs {
    /// POST to `key/`.
    #[must_use]
    pub fn call(self) -> Call {
        let note = format!("Key successfully created: {}", self.name);
        let mut body = Map::new();
        body.insert("name".into(), Value::String(self.name));
        insert_opt(&mut body, "description", self.description);
        insert_opt(&mut body, "keyset_guid", self.keyset_guid);
        body.insert("cipher".into(), Value::String(self.cipher));
        Call::new(VaultRequest::post(Route::action(["key"]), Value::Object(body))).with_note(note)
    }
}

/// Flags of `generate-key-csr`.
#[derive(Args, Debug, Clone)]
pub struct GenerateKeyCsrArgs {
    /// Keyset GUID
    #[arg(short = 'k', long = "keyset_guid")]
    pub keyset_guid: Option<String>,

    /// Public key
    #[arg(short = 'p', long = "public_key")]
    pub public_key: Option<String>,

    /// Cipher
    #[arg(short = 'c', long)]
    pub cipher: String,

    /// Subject DN of the certificate signing request
    #[arg(short = 'S', long = "subject_dn")]
    pub subject_dn: Option<String>,

    /// Subject alternative names
    #[arg(short = 's', long)]
    pub sans: Option<String>,
}

impl GenerateKeyCsrArgs {
    /// POST to `generate_key_csr/`.
    #[must_use]
    pub fn call(self) -> Call {
        let mut body = Map::new();
        body.insert("cipher".into(), Value::String(self.cipher));
        insert_opt(&mut body, "public_key", self.public_key);
        insert_opt(&mut body, "keyset_guid", self.keyset_guid);
        insert_opt(&mut body, "subject_dn", self.subject_dn);
        insert_opt(&mut body, "sans", self.sans);
        Call::new(VaultRequest::post(
            Route::action(["generate_key_csr"]),
            Value::Object(body),
        ))
        .with_note("Key successfully generated")
    }
}

/// Flags of `list-of-keys`.
#[derive(Args, Debug, Clone)]
pub struct ListKeysArgs {
    /// Keyset GUID
    #[arg(short = 'k', long = "keyset_guid", default_value = "")]
    pub keyset_guid: String,

    /// Cryptographic algorithm
    #[arg(short = 'c', long = "cryptographic_algorithm")]
    pub cryptographic_algorithm: Option<String>,

    /// Key status
    #[arg(short = 's', long)]
    pub status: Option<String>,
}

impl ListKeysArgs {
    /// GET `keys/{keyset}/` with the filters as JSON body.
    #[must_use]
    pub fn call(self) -> Call {
        let mut body = Map::new();
        insert_opt(&mut body, "cryptographic_algorithm", self.cryptographic_algorithm);
        insert_opt(&mut body, "status", self.status);
        Call::new(VaultRequest::get_with_body(
            Route::action(["keys".to_string(), self.keyset_guid]),
            Value::Object(body),
        ))
    }
}

/// Single `--key_guid` flag.
#[derive(Args, Debug, Clone)]
pub struct KeyGuidArgs {
    /// Key GUID
    #[arg(short = 'k', long = "key_guid")]
    pub key_guid: String,
}

impl KeyGuidArgs {
    /// DELETE `key/{guid}/purge/`.
    #[must_use]
    pub fn purge_call(self) -> Call {
        Call::new(VaultRequest::delete(key_route(self.key_guid, &["purge"])))
    }
}

/// Flags of `set-key-property`.
#[derive(Args, Debug, Clone)]
pub struct SetKeyPropertyArgs {
    /// Key GUID
    #[arg(short = 'k', long = "key_guid")]
    pub key_guid: String,

    /// New description for Key
    #[arg(short = 'd', long)]
    pub description: String,
}

impl SetKeyPropertyArgs {
    /// PATCH `key/{guid}/`.
    #[must_use]
    pub fn call(self) -> Call {
        Call::new(VaultRequest::patch(
            key_route(self.key_guid, &[]),
            json!({ "description": self.description }),
        ))
    }
}

/// Flags of `update-key-state`.
#[derive(Args, Debug, Clone)]
pub struct UpdateKeyStateArgs {
    /// Key GUID
    #[arg(short = 'k', long = "key_guid")]
    pub key_guid: String,

    /// State. Supported states are enable and disable
    #[arg(short = 's', long)]
    pub state: String,
}

impl UpdateKeyStateArgs {
    /// POST to `key/{guid}/state/`.
    #[must_use]
    pub fn call(self) -> Call {
        Call::new(VaultRequest::post(
            key_route(self.key_guid, &["state"]),
            json!({ "state": self.state }),
        ))
    }
}

/// Flags of `schedule-delete-key`.
#[derive(Args, Debug, Clone)]
pub struct ScheduleDeleteKeyArgs {
    /// Key GUID
    #[arg(short = 'k', long = "key_guid")]
    pub key_guid: String,

    /// Operation. Supported operations are schedule_destroy and cancel_destroy
    #[arg(short = 'o', long)]
    pub operation: String,

    /// Days before the key is destroyed
    #[arg(short = 'r', long = "retention_period", default_value_t = 30)]
    pub retention_period: i64,
}

impl ScheduleDeleteKeyArgs {
    /// POST to `key/{guid}/delete/`.
    #[must_use]
    pub fn call(self) -> Call {
        Call::new(VaultRequest::post(
            key_route(self.key_guid, &["delete"]),
            json!({
                "operation": self.operation,
                "retention_period": self.retention_period,
            }),
        ))
    }
}

/// Flags of `export-key`.
#[derive(Args, Debug, Clone)]
pub struct ExportKeyArgs {
    /// Key GUID
    #[arg(short = 'k', long = "key_guid")]
    pub key_guid: String,

    /// Public Key File used to wrap the exported key
    #[arg(short = 'p', long = "public_key")]
    pub public_key: PathBuf,

    /// Ask for SHA-256 wrapping
    #[arg(short = 's', long)]
    pub sha256: bool,
}

impl ExportKeyArgs {
    /// Multipart POST to `key/{guid}/export/`.
    #[must_use]
    pub fn call(self) -> Call {
        let mut route = key_route(self.key_guid, &["export"]);
        if self.sha256 {
            route = route.query("sha256", "yes");
        }
        Call::new(VaultRequest::multipart(
            route,
            vec![FormField::file("public_key", self.public_key)],
        ))
    }
}

/// Flags of `export-public-key`.
#[derive(Args, Debug, Clone)]
pub struct ExportPublicKeyArgs {
    /// Key GUID
    #[arg(short = 'k', long = "key_guid")]
    pub key_guid: String,

    /// Download the public key to a file
    #[arg(short = 'd', long)]
    pub download: bool,
}

impl ExportPublicKeyArgs {
    /// GET the public key, or download it with `--download`.
    #[must_use]
    pub fn invocation(self) -> Invocation {
        if self.download {
            let fallback_name = format!("{}_public.pem", self.key_guid);
            let segments = ["key".to_string(), self.key_guid, "export".into(), "public".into()];
            let route = Route::bare(segments).query("download", "yes");
            return Invocation::Download {
                route,
                fallback_name,
            };
        }
        Call::new(VaultRequest::get(key_route(self.key_guid, &["export", "public"]))).into()
    }
}

/// Flags of `enable-hsm-for-keyset`.
#[derive(Args, Debug, Clone)]
pub struct EnableHsmArgs {
    /// Keyset GUID
    #[arg(short = 'k', long = "keyset_guid")]
    pub keyset_guid: String,

    /// HSM partition label
    #[arg(short = 'l', long = "part_label", default_value = "")]
    pub part_label: String,

    /// HSM partition password
    #[arg(short = 'p', long = "part_password", default_value = "", hide_default_value = true)]
    pub part_password: String,
}

impl EnableHsmArgs {
    /// POST to `EnableKeysetHSM/`.
    #[must_use]
    pub fn call(self) -> Call {
        Call::new(VaultRequest::post(
            Route::action(["EnableKeysetHSM"]),
            json!({
                "keyset_guid": self.keyset_guid,
                "part_label": self.part_label,
                "part_password": self.part_password,
            }),
        ))
    }
}

/// `key/{guid}/{rest...}/`
fn key_route(key_guid: String, rest: &[&str]) -> Route {
    let segments = ["key".to_string(), key_guid]
        .into_iter()
        .chain(rest.iter().map(|s| (*s).to_string()));
    Route::action(segments)
}

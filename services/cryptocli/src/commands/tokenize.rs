//! Tokenize, detokenize and mask, single and batch.

use super::{ensure_paired, insert_opt, Call};
use crate::error::CliError;
use clap::Args;
use serde_json::{json, Map, Value};
use vault_client::{Route, VaultRequest};

/// Batch key GUID placeholder meaning "latest key version".
pub const LATEST_KEY: &str = "0";

/// Flags of `tokenize` and `detokenize`.
#[derive(Args, Debug, Clone)]
pub struct TokenArgs {
    /// Name of the tokenization policy
    #[arg(short = 'n', long = "policyName")]
    pub policy_name: String,

    /// Data to be tokenized or detokenized
    #[arg(short = 'd', long = "tokenData")]
    pub token_data: String,

    /// Key version to use. If not provided, latest key version will be used
    #[arg(short = 'k', long = "keyGuid")]
    pub key_guid: Option<String>,
}

impl TokenArgs {
    /// POST to `action/`.
    #[must_use]
    pub fn call(self, action: &str) -> Call {
        let mut body = Map::new();
        body.insert("policyName".into(), Value::String(self.policy_name));
        body.insert("tokenData".into(), Value::String(self.token_data));
        insert_opt(&mut body, "keyGuid", self.key_guid);
        Call::new(VaultRequest::post(Route::action([action]), Value::Object(body)))
    }
}

/// Flags of `mask`.
#[derive(Args, Debug, Clone)]
pub struct MaskArgs {
    /// Name of the mask policy
    #[arg(short = 'n', long = "policyName")]
    pub policy_name: String,

    /// Data to be masked
    #[arg(short = 'd', long = "tokenData")]
    pub token_data: String,
}

impl MaskArgs {
    /// POST to `mask/`.
    #[must_use]
    pub fn call(self) -> Call {
        let body = json!({
            "policyName": self.policy_name,
            "tokenData": self.token_data,
        });
        Call::new(VaultRequest::post(Route::action(["mask"]), body))
    }
}

/// Flags of `detoken-mask`.
#[derive(Args, Debug, Clone)]
pub struct DetokenMaskArgs {
    /// Name of the policy
    #[arg(short = 'n', long = "policyName")]
    pub policy_name: String,

    /// Token to be detokenized and masked
    #[arg(short = 'd', long = "tokenData")]
    pub token_data: String,

    /// Key version the token was created with
    #[arg(short = 'k', long = "keyGuid", default_value = "")]
    pub key_guid: String,
}

impl DetokenMaskArgs {
    /// POST to `detoken_mask/`; `keyGuid` is always sent.
    #[must_use]
    pub fn call(self) -> Call {
        let body = json!({
            "policyName": self.policy_name,
            "tokenData": self.token_data,
            "keyGuid": self.key_guid,
        });
        Call::new(VaultRequest::post(Route::action(["detoken_mask"]), body))
    }
}

/// Flags of `batch-tokenize` and `batch-detokenize`. Values pair up by
/// position.
#[derive(Args, Debug, Clone)]
pub struct BatchArgs {
    /// Policy name. This option is repeatable
    #[arg(short = 'n', long = "policyName", required = true)]
    pub policy_name: Vec<String>,

    /// Data or token. This option is repeatable
    #[arg(short = 'd', long = "tokenData", required = true)]
    pub token_data: Vec<String>,

    /// Key GUID, or 0 for the latest key version. This option is repeatable
    #[arg(short = 'k', long = "keyGuid", required = true)]
    pub key_guid: Vec<String>,
}

impl BatchArgs {
    /// POST the batch to `batch/action/`.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::InvalidInput`] unless every flag was given the
    /// same number of times.
    pub fn call(self, action: &str) -> Result<Call, CliError> {
        ensure_paired(&[
            self.policy_name.len(),
            self.token_data.len(),
            self.key_guid.len(),
        ])?;

        let items = self
            .policy_name
            .into_iter()
            .zip(self.token_data)
            .zip(self.key_guid)
            .map(|((policy_name, token_data), key_guid)| {
                let mut item = Map::new();
                item.insert("policyName".into(), Value::String(policy_name));
                item.insert("tokenData".into(), Value::String(token_data));
                if key_guid != LATEST_KEY {
                    item.insert("keyGuid".into(), Value::String(key_guid));
                }
                Value::Object(item)
            })
            .collect();

        Ok(Call::new(VaultRequest::post(
            Route::action(["batch", action]),
            Value::Array(items),
        ))
        .ignoring_errors())
    }
}

/// Flags of `batch-mask`.
#[derive(Args, Debug, Clone)]
pub struct BatchMaskArgs {
    /// Mask policy name. This option is repeatable
    #[arg(short = 'n', long = "policyName", required = true)]
    pub policy_name: Vec<String>,

    /// Data to be masked. This option is repeatable
    #[arg(short = 'd', long = "tokenData", required = true)]
    pub token_data: Vec<String>,
}

impl BatchMaskArgs {
    /// POST the batch to `batch/mask/`.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::InvalidInput`] for unequal flag counts.
    pub fn call(self) -> Result<Call, CliError> {
        ensure_paired(&[self.policy_name.len(), self.token_data.len()])?;

        let items = self
            .policy_name
            .into_iter()
            .zip(self.token_data)
            .map(|(policy_name, token_data)| {
                json!({ "policyName": policy_name, "tokenData": token_data })
            })
            .collect();

        Ok(Call::new(VaultRequest::post(
            Route::action(["batch", "mask"]),
            Value::Array(items),
        ))
        .ignoring_errors())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use vault_client::RequestBody;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[test]
    fn test_tokenize_body() {
        let call = TokenArgs {
            policy_name: "ssn".into(),
            token_data: "123-45-6789".into(),
            key_guid: None,
        }
        .call("token");

        assert_eq!(call.request.method.as_str(), "POST");
        assert_eq!(call.request.route, Route::action(["token"]));
        assert_eq!(
            call.request.json(),
            Some(&json!({"policyName": "ssn", "tokenData": "123-45-6789"}))
        );
    }

    #[test]
    fn test_key_guid_sent_when_given() {
        let call = TokenArgs {
            policy_name: "ssn".into(),
            token_data: "tok".into(),
            key_guid: Some(String::new()),
        }
        .call("detoken");

        assert_eq!(call.request.route, Route::action(["detoken"]));
        assert_eq!(call.request.json().unwrap()["keyGuid"], json!(""));
    }

    #[test]
    fn test_detoken_mask_always_sends_key_guid() {
        let call = DetokenMaskArgs {
            policy_name: "card".into(),
            token_data: "9999".into(),
            key_guid: String::new(),
        }
        .call();
        assert_eq!(call.request.route, Route::action(["detoken_mask"]));
        assert_eq!(
            call.request.json(),
            Some(&json!({"policyName": "card", "tokenData": "9999", "keyGuid": ""}))
        );
    }

    #[test]
    fn test_batch_omits_latest_key_placeholder() {
        let call = BatchArgs {
            policy_name: strings(&["a", "b"]),
            token_data: strings(&["1", "2"]),
            key_guid: strings(&["0", "k-2"]),
        }
        .call("detoken")
        .unwrap();

        assert_eq!(call.request.route, Route::action(["batch", "detoken"]));
        assert!(!call.reports_errors);
        assert_eq!(
            call.request.json(),
            Some(&json!([
                {"policyName": "a", "tokenData": "1"},
                {"policyName": "b", "tokenData": "2", "keyGuid": "k-2"},
            ]))
        );
    }

    #[test]
    fn test_batch_rejects_unpaired_flags() {
        let err = BatchArgs {
            policy_name: strings(&["a", "b"]),
            token_data: strings(&["1"]),
            key_guid: strings(&["0", "0"]),
        }
        .call("token")
        .unwrap_err();
        assert_eq!(err.to_string(), "Missing parameters. Please check and try again");

        let err = BatchMaskArgs {
            policy_name: strings(&["a"]),
            token_data: strings(&["1", "2"]),
        }
        .call()
        .unwrap_err();
        assert_eq!(err.code(), 1);
    }

    #[test]
    fn test_batch_mask_body() {
        let call = BatchMaskArgs {
            policy_name: strings(&["p"]),
            token_data: strings(&["4111111111111111"]),
        }
        .call()
        .unwrap();
        assert!(matches!(
            call.request.body,
            RequestBody::Json(Value::Array(ref items)) if items.len() == 1
        ));
        assert!(!call.reports_errors);
    }

    proptest! {
        #[test]
        fn prop_batch_preserves_order(
            (names, data, keys) in test_utils::batch_strategy(8),
        ) {
            let call = BatchArgs {
                policy_name: names.clone(),
                token_data: data.clone(),
                key_guid: keys.clone(),
            }
            .call("token")
            .unwrap();

            let items = call.request.json().unwrap().as_array().unwrap().clone();
            prop_assert_eq!(items.len(), names.len());
            for (i, item) in items.iter().enumerate() {
                prop_assert_eq!(&item["policyName"], &json!(names[i]));
                prop_assert_eq!(&item["tokenData"], &json!(data[i]));
                prop_assert_eq!(item.get("keyGuid").is_some(), keys[i] != LATEST_KEY);
            }
        }
    }
}

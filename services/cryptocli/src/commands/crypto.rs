//! Encrypt, decrypt, sign and wrap with vault-held keys.

use super::{insert_opt, Call};
use clap::Args;
use serde_json::{json, Map, Value};
use vault_client::{Route, VaultRequest};

/// Flags of `encrypt` and `decrypt`.
#[derive(Args, Debug, Clone)]
pub struct CipherArgs {
    /// Key GUID to be used
    #[arg(short = 'k', long = "keyGuid")]
    pub key_guid: String,

    /// Input data
    #[arg(short = 'd', long)]
    pub data: String,

    /// Cipher mode
    #[arg(short = 'm', long)]
    pub mode: String,

    /// Initialization vector
    #[arg(short = 'i', long, default_value = "")]
    pub iv: String,

    /// Additional authentication data
    #[arg(short = 'a', long, default_value = "")]
    pub aad: String,
}

impl CipherArgs {
    /// POST to `action/`. `iv` and `aad` are always sent.
    #[must_use]
    pub fn call(self, action: &str) -> Call {
        let body = json!({
            "keyGuid": self.key_guid,
            "data": self.data,
            "mode": self.mode,
            "iv": self.iv,
            "aad": self.aad,
        });
        Call::new(VaultRequest::post(Route::action([action]), body))
    }
}

/// Flags of `sign` and `wrap`.
#[derive(Args, Debug, Clone)]
pub struct SignArgs {
    /// Key GUID to be used
    #[arg(short = 'k', long = "keyGuid")]
    pub key_guid: String,

    /// Input data
    #[arg(short = 'd', long)]
    pub data: String,

    /// Mode
    #[arg(short = 'm', long)]
    pub mode: Option<String>,
}

impl SignArgs {
    /// POST to `action/`.
    #[must_use]
    pub fn call(self, action: &str) -> Call {
        let mut body = Map::new();
        body.insert("keyGuid".into(), Value::String(self.key_guid));
        body.insert("data".into(), Value::String(self.data));
        insert_opt(&mut body, "mode", self.mode);
        Call::new(VaultRequest::post(Route::action([action]), Value::Object(body)))
    }
}

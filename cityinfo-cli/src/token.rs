//! `token` and `verify-token` commands.

use std::io::Write;

use clap::Parser;
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::{ARG_SECRET, ARG_TOKEN, ARG_USER_NAME, CliError};

#[cfg(feature = "auth")]
const DEFAULT_ISSUER: &str = "cityinfo";
#[cfg(feature = "auth")]
const DEFAULT_AUDIENCE: &str = "cityinfoapi";
#[cfg(feature = "auth")]
const DEFAULT_LIFETIME_SECS: u64 = 3600;

/// CLI arguments for the `token` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "token",
    long_about = "Check the credentials and print a signed HS256 bearer \
                 token carrying the user's identity and home city. The \
                 secret must be at least 32 bytes long.",
    about = "Issue a bearer token"
)]
#[ortho_config(prefix = "CITYINFO")]
pub(crate) struct TokenArgs {
    /// HMAC signing secret.
    #[arg(long = ARG_SECRET, value_name = "secret")]
    #[serde(default)]
    pub(crate) secret: Option<String>,
    /// Token issuer (defaults to `cityinfo`).
    #[arg(long, value_name = "issuer")]
    #[serde(default)]
    pub(crate) issuer: Option<String>,
    /// Token audience (defaults to `cityinfoapi`).
    #[arg(long, value_name = "audience")]
    #[serde(default)]
    pub(crate) audience: Option<String>,
    /// Token lifetime in seconds (defaults to 3600).
    #[arg(long, value_name = "seconds")]
    #[serde(default)]
    pub(crate) lifetime_secs: Option<u64>,
    /// Login name.
    #[arg(long = ARG_USER_NAME, value_name = "name")]
    #[serde(default)]
    pub(crate) user_name: Option<String>,
    /// Password checked by the user directory.
    #[arg(long, value_name = "password")]
    #[serde(default)]
    pub(crate) password: Option<String>,
}

/// CLI arguments for the `verify-token` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "verify-token",
    about = "Validate a bearer token and report its claims"
)]
#[ortho_config(prefix = "CITYINFO")]
pub(crate) struct VerifyTokenArgs {
    /// HMAC signing secret.
    #[arg(long = ARG_SECRET, value_name = "secret")]
    #[serde(default)]
    pub(crate) secret: Option<String>,
    /// Expected issuer (defaults to `cityinfo`).
    #[arg(long, value_name = "issuer")]
    #[serde(default)]
    pub(crate) issuer: Option<String>,
    /// Expected audience (defaults to `cityinfoapi`).
    #[arg(long, value_name = "audience")]
    #[serde(default)]
    pub(crate) audience: Option<String>,
    /// Token to validate.
    #[arg(long = ARG_TOKEN, value_name = "token")]
    #[serde(default)]
    pub(crate) token: Option<String>,
}

#[cfg(feature = "auth")]
mod enabled {
    use std::io::Write;
    use std::time::Duration;

    use cityinfo_auth::{ClaimPolicy, Claims, PermissiveDirectory, TokenIssuer, TokenSettings};
    use ortho_config::SubcmdConfigMerge;
    use serde::Serialize;

    use super::{
        DEFAULT_AUDIENCE, DEFAULT_ISSUER, DEFAULT_LIFETIME_SECS, TokenArgs, VerifyTokenArgs,
    };
    use crate::output::write_json;
    use crate::{
        ARG_SECRET, ARG_TOKEN, ARG_USER_NAME, CliError, ENV_TOKEN_SECRET, ENV_TOKEN_USER_NAME,
        ENV_VERIFY_SECRET, ENV_VERIFY_TOKEN,
    };

    fn settings(
        secret: String,
        issuer: Option<String>,
        audience: Option<String>,
        lifetime_secs: Option<u64>,
    ) -> TokenSettings {
        TokenSettings {
            secret: secret.into_bytes(),
            issuer: issuer.unwrap_or_else(|| DEFAULT_ISSUER.to_owned()),
            audience: audience.unwrap_or_else(|| DEFAULT_AUDIENCE.to_owned()),
            lifetime: Duration::from_secs(lifetime_secs.unwrap_or(DEFAULT_LIFETIME_SECS)),
        }
    }

    pub(super) fn issue(args: TokenArgs, writer: &mut dyn Write) -> Result<(), CliError> {
        let merged = args.load_and_merge().map_err(CliError::Configuration)?;
        let secret = merged.secret.ok_or(CliError::MissingArgument {
            field: ARG_SECRET,
            env: ENV_TOKEN_SECRET,
        })?;
        let user_name = merged.user_name.ok_or(CliError::MissingArgument {
            field: ARG_USER_NAME,
            env: ENV_TOKEN_USER_NAME,
        })?;
        let issuer = TokenIssuer::new(
            settings(secret, merged.issuer, merged.audience, merged.lifetime_secs),
            PermissiveDirectory,
        )?;
        let user = issuer.authenticate(&user_name, merged.password.as_deref().unwrap_or(""))?;
        write_json(writer, &user)
    }

    #[derive(Debug, Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Verification {
        claims: Claims,
        must_be_from_antwerp: bool,
    }

    pub(super) fn verify(args: VerifyTokenArgs, writer: &mut dyn Write) -> Result<(), CliError> {
        let merged = args.load_and_merge().map_err(CliError::Configuration)?;
        let secret = merged.secret.ok_or(CliError::MissingArgument {
            field: ARG_SECRET,
            env: ENV_VERIFY_SECRET,
        })?;
        let token = merged.token.ok_or(CliError::MissingArgument {
            field: ARG_TOKEN,
            env: ENV_VERIFY_TOKEN,
        })?;
        let issuer = TokenIssuer::new(
            settings(secret, merged.issuer, merged.audience, None),
            PermissiveDirectory,
        )?;
        let claims = issuer.validate(&token)?;
        let must_be_from_antwerp = ClaimPolicy::must_be_from_antwerp().is_satisfied_by(&claims);
        write_json(
            writer,
            &Verification {
                claims,
                must_be_from_antwerp,
            },
        )
    }
}

#[cfg(feature = "auth")]
pub(crate) fn run_token_with(args: TokenArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    enabled::issue(args, writer)
}

#[cfg(not(feature = "auth"))]
pub(crate) fn run_token_with(_args: TokenArgs, _writer: &mut dyn Write) -> Result<(), CliError> {
    Err(CliError::MissingFeature {
        feature: "auth",
        action: "token",
    })
}

#[cfg(feature = "auth")]
pub(crate) fn run_verify_token_with(
    args: VerifyTokenArgs,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    enabled::verify(args, writer)
}

#[cfg(not(feature = "auth"))]
pub(crate) fn run_verify_token_with(
    _args: VerifyTokenArgs,
    _writer: &mut dyn Write,
) -> Result<(), CliError> {
    Err(CliError::MissingFeature {
        feature: "auth",
        action: "verify-token",
    })
}

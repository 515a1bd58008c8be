use anyhow::Result;
use nsbridge_auth::{ConnectorConfig, ConnectorService};

use crate::cli::{LoginArgs, LookupArgs};
use crate::output::print_json;

pub async fn lookup(config: ConnectorConfig, args: &LookupArgs) -> Result<()> {
    let service = ConnectorService::new(config)?;
    let profile = service.lookup(args.email.trim()).await?;
    print_json(&serde_json::to_value(&profile)?);
    Ok(())
}

/// Always ends in an error: the connector has no successful login.
pub async fn login(config: ConnectorConfig, args: &LoginArgs) -> Result<()> {
    let service = ConnectorService::new(config)?;
    match service.login(args.email.trim(), &args.password).await {
        Ok(never) => match never {},
        Err(err) => Err(err.into()),
    }
}

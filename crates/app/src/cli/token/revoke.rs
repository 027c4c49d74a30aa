use clap::Args;
use storefront_app::auth::{PgAuthService, UserUuid};

#[derive(Debug, Args)]
pub(crate) struct RevokeTokensArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// User whose tokens should be revoked
    #[arg(long)]
    user_uuid: UserUuid,
}

pub(crate) async fn run(args: RevokeTokensArgs) -> Result<(), String> {
    let pool = super::super::connect(&args.database_url).await?;

    let revoked = PgAuthService::new(pool)
        .revoke_api_tokens(args.user_uuid)
        .await
        .map_err(|error| format!("failed to revoke tokens: {error}"))?;

    println!("revoked {revoked} token(s) for user {}", args.user_uuid);

    Ok(())
}

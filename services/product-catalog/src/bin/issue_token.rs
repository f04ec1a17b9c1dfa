//! 为运维和本地调试签发访问令牌
//!
//! 用法：`issue-token <username> [user-uuid]`

use catalog_auth_core::TokenService;
use catalog_common::UserId;
use catalog_config::AppConfig;
use secrecy::ExposeSecret;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let mut args = std::env::args().skip(1);
    let username = args
        .next()
        .ok_or("usage: issue-token <username> [user-uuid]")?;
    let user_id = match args.next() {
        Some(raw) => UserId::from_string(&raw)?,
        None => UserId::new(),
    };

    let config_dir = std::env::var("CATALOG_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());
    let config = AppConfig::load(&config_dir)?;

    let tokens = TokenService::new(
        config.jwt.secret.expose_secret(),
        config.jwt.expires_in as i64,
        config.jwt.issuer.clone(),
        config.jwt.audience.clone(),
    );
    let token = tokens.generate_access_token(&user_id, &username)?;

    println!("{}", token);
    Ok(())
}

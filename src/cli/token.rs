use crate::app_data::AppData;
use crate::services::TokenService;

/// Print a bearer token signed with the configured secret
///
/// Meant for local development, where no identity provider issues tokens.
pub fn print_token(
    app_data: &AppData,
    subject_id: &str,
    username: Option<&str>,
    ttl_seconds: i64,
) -> Result<(), Box<dyn std::error::Error>> {
    if ttl_seconds <= 0 {
        return Err("ttl must be positive".into());
    }

    let claims = TokenService::claims_for(subject_id, username, ttl_seconds);
    let token = app_data.token_service.issue_jwt(&claims)?;
    println!("{}", token);

    Ok(())
}

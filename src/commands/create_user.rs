//! Create-user command.
//!
//! Registration flows live in the web/mobile clients against a separate
//! identity deployment; this command lets an operator insert a user row
//! directly (with a bcrypt-hashed password) and prints a signed token so the
//! account is immediately usable against this server.

use anyhow::{bail, Context, Result};
use log::info;

use krishi_api::auth::sign_token;
use krishi_commons::{AuthProvider, FarmerType};
use krishi_core::users::NewUser;
use krishi_server::config::ServerConfig;
use krishi_server::lifecycle::ApplicationComponents;

const USAGE: &str =
    "Usage: krishi-server create-user <name> <email> <password> <phone> <location> <primary-crops> [farmer-type]";

#[derive(Debug, PartialEq)]
struct CreateUserArgs {
    name: String,
    email: String,
    password: String,
    phone: String,
    location: String,
    primary_crops: String,
    farmer_type: FarmerType,
}

fn parse_args(args: &[String]) -> Result<CreateUserArgs> {
    if args.len() < 6 || args.len() > 7 {
        bail!("{}", USAGE);
    }
    let farmer_type = match args.get(6).map(String::as_str) {
        None | Some("subsistence") => FarmerType::Subsistence,
        Some("commercial") => FarmerType::Commercial,
        Some("hobbyist") => FarmerType::Hobbyist,
        Some("student") => FarmerType::Student,
        Some(other) => bail!("Invalid farmer type: {}", other),
    };
    Ok(CreateUserArgs {
        name: args[0].clone(),
        email: args[1].clone(),
        password: args[2].clone(),
        phone: args[3].clone(),
        location: args[4].clone(),
        primary_crops: args[5].clone(),
        farmer_type,
    })
}

/// Creates the user and prints its id plus a ready-to-use bearer token.
pub async fn run(
    args: &[String],
    config: &ServerConfig,
    components: &ApplicationComponents,
) -> Result<()> {
    let parsed = parse_args(args)?;

    let password_hash = bcrypt::hash(&parsed.password, bcrypt::DEFAULT_COST)
        .context("hashing password")?;

    let user = components
        .app_context
        .users()
        .create(NewUser {
            name: parsed.name,
            email: parsed.email,
            password_hash: Some(password_hash),
            auth_provider: AuthProvider::Local,
            google_id: None,
            phone: parsed.phone,
            location: parsed.location,
            farmer_type: parsed.farmer_type,
            primary_crops: parsed.primary_crops,
            avatar: None,
        })
        .await
        .context("creating user")?;

    let token = sign_token(
        &user.user_id,
        &config.auth.jwt_secret,
        config.auth.jwt_expiry_hours,
    )
    .context("signing token")?;

    info!("Created user '{}' ({})", user.name, user.user_id);
    println!("user_id: {}", user.user_id);
    println!("token: {}", token);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_full_argument_list() {
        let parsed = parse_args(&args(&[
            "Sita",
            "sita@example.com",
            "hunter2secret",
            "9800000000",
            "Chitwan",
            "rice, maize",
            "commercial",
        ]))
        .unwrap();
        assert_eq!(parsed.farmer_type, FarmerType::Commercial);
        assert_eq!(parsed.email, "sita@example.com");
    }

    #[test]
    fn farmer_type_defaults_to_subsistence() {
        let parsed = parse_args(&args(&[
            "Sita",
            "sita@example.com",
            "hunter2secret",
            "98",
            "Chitwan",
            "rice",
        ]))
        .unwrap();
        assert_eq!(parsed.farmer_type, FarmerType::Subsistence);
    }

    #[test]
    fn rejects_wrong_arity_and_unknown_type() {
        assert!(parse_args(&args(&["too", "few"])).is_err());
        assert!(parse_args(&args(&[
            "Sita",
            "s@e.com",
            "pw",
            "98",
            "loc",
            "rice",
            "astronaut"
        ]))
        .is_err());
    }
}

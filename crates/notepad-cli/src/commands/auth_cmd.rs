use crate::cli::AuthCommands;
use crate::config_profiles::{normalize_text_option, CliProfilesConfig};
use crate::credentials::{
    clear_credentials, load_credentials, store_credentials, StoredCredentials,
};
use crate::error::CliError;

pub fn run_auth(command: AuthCommands, global_profile: Option<&str>) -> Result<(), CliError> {
    match command {
        AuthCommands::Login {
            api_key,
            token,
            storage_access_key_id,
            storage_secret_access_key,
            storage_session_token,
        } => {
            let config = CliProfilesConfig::load().map_err(CliError::Config)?;
            let profile_name = config.resolve_profile_name(global_profile);
            let provided = StoredCredentials {
                api_key: normalize_text_option(api_key),
                api_token: normalize_text_option(token),
                storage_access_key_id: normalize_text_option(storage_access_key_id),
                storage_secret_access_key: normalize_text_option(storage_secret_access_key),
                storage_session_token: normalize_text_option(storage_session_token),
            };
            if provided.is_empty() {
                return Err(CliError::EmptyCredentials);
            }

            let stored = store_credentials(&profile_name, provided)?;
            tracing::info!("Stored credentials for profile '{}'", profile_name);
            println!(
                "Signed in profile '{}' ({})",
                profile_name,
                stored.summary().join(", ")
            );
            Ok(())
        }
        AuthCommands::Status => {
            let config = CliProfilesConfig::load().map_err(CliError::Config)?;
            let profile_name = config.resolve_profile_name(global_profile);
            match load_credentials(&profile_name)? {
                Some(credentials) if !credentials.is_empty() => {
                    println!(
                        "Profile '{}' is signed in ({})",
                        profile_name,
                        credentials.summary().join(", ")
                    );
                }
                _ => println!("Profile '{profile_name}' is not signed in."),
            }
            Ok(())
        }
        AuthCommands::Logout => {
            let config = CliProfilesConfig::load().map_err(CliError::Config)?;
            let profile_name = config.resolve_profile_name(global_profile);
            clear_credentials(&profile_name)?;
            tracing::info!("Cleared credentials for profile '{}'", profile_name);
            println!("Signed out profile '{profile_name}'");
            Ok(())
        }
    }
}

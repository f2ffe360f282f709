#[cfg(test)]
use crate::auth::{Credential, CredentialSource};
#[cfg(test)]
use crate::core::app::{App, AppInitConfig};
#[cfg(test)]
use crate::core::settings::Settings;
#[cfg(test)]
use std::path::Path;

#[cfg(test)]
pub const TEST_TOKEN: &str = "r8_0123456789abcdefghijklmnopqrstuvwxyzA";

#[cfg(test)]
pub fn create_test_app_with_feedback(feedback_path: &Path) -> App {
    App::new(AppInitConfig {
        settings: Settings::default(),
        credential: Some(Credential::new(TEST_TOKEN, CredentialSource::Environment)),
        feedback_path: feedback_path.to_path_buf(),
        base_url: "https://api.test.com/v1".to_string(),
    })
}

#[cfg(test)]
pub fn create_test_app() -> App {
    create_test_app_with_feedback(Path::new("unused-feedback.csv"))
}

#[cfg(test)]
pub fn create_app_without_credential() -> App {
    let mut app = create_test_app();
    app.credential = None;
    app
}

/// Runtime environment, selected with the `ENV` variable.
///
/// Debug builds default to `Development`, release builds to `Production`.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

pub fn which() -> Environment {
    #[cfg(debug_assertions)]
    let default_env = Environment::Development;
    #[cfg(not(debug_assertions))]
    let default_env = Environment::Production;

    match std::env::var("ENV") {
        Err(_) => default_env,
        Ok(v) => match v.to_ascii_lowercase().as_str() {
            "production" => Environment::Production,
            "development" => Environment::Development,
            _ => default_env,
        },
    }
}

//! Local principal: the OS user the tool runs as.

/// Name of the current OS user, used as default login and index owner.
pub fn current_user() -> String {
    #[cfg(unix)]
    {
        if let Ok(Some(user)) = nix::unistd::User::from_uid(nix::unistd::getuid()) {
            return user.name;
        }
    }
    env_user().unwrap_or_else(|| "unknown".to_string())
}

fn env_user() -> Option<String> {
    ["USER", "USERNAME", "LOGNAME"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|v| !v.is_empty())
}

use clap::Parser;

/// Versioned template repository the tool renders from when not in dev
/// mode.
pub const DEFAULT_BASE_URL: &str = "https://raw.githubusercontent.com/gostrap/templates/v1/";

#[derive(Parser, Debug)]
#[command(
    name = "gostrap",
    version,
    about = "guided build plumbing setup for Go modules"
)]
pub struct Cli {
    /// Resolve template resources from the project directory instead of
    /// the remote template repository (for developing the templates)
    #[arg(long)]
    pub dev: bool,

    /// Base URL of the remote template repository
    #[arg(long, env = "GOSTRAP_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,
}

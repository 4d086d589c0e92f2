pub mod server;

/// What the binary was asked to do.
#[derive(Debug)]
pub enum Action {
    /// Serve the login, register and dashboard pages.
    Server(server::Args),
}

impl Action {
    /// # Errors
    /// Returns an error if the server cannot start or stops with an error.
    pub async fn execute(self) -> anyhow::Result<()> {
        match self {
            Self::Server(args) => server::execute(args).await,
        }
    }
}

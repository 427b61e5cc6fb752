use crate::commands::Commands;
use rescope_config::Settings;

impl Commands {
    pub async fn execute(self, settings: Settings) -> eyre::Result<()> {
        match self {
            Commands::Demo {
                fail_open,
                fail_body,
                concurrent,
            } => {
                let options = crate::commands::demo::DemoOptions {
                    fail_open,
                    fail_body,
                    concurrent,
                };
                crate::commands::demo::execute(&settings, options).await?;
                Ok(())
            }
            Commands::Serve { bind } => crate::commands::serve::execute(&settings, bind).await,
        }
    }
}

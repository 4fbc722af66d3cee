//! # License Commands Implementation
//!
//! `license list` prints the keys accepted by `create --license`;
//! `license show` prints one license text.

use anyhow::Result;
use clap::{Args, Subcommand};

use kickoff::license::{GitHubLicenseProvider, LicenseProvider, LicenseSummary};
use kickoff::output::OutputConfig;

use super::Session;

/// License subcommands
#[derive(Subcommand, Debug)]
pub enum LicenseCommand {
    /// List available licenses
    List(ListArgs),
    /// Print the text of a license
    Show(ShowArgs),
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Print the list as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// License key, e.g. `mit` or `apache-2.0`.
    pub key: String,
}

/// Execute a `license` subcommand.
pub fn execute(session: &Session, command: LicenseCommand) -> Result<()> {
    run(&GitHubLicenseProvider::new(), &session.output, command)
}

fn run(
    provider: &dyn LicenseProvider,
    output: &OutputConfig,
    command: LicenseCommand,
) -> Result<()> {
    match command {
        LicenseCommand::List(args) => {
            let licenses = provider.list()?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&licenses)?);
            } else {
                print!("{}", format_list(output, &licenses));
            }
        }
        LicenseCommand::Show(args) => {
            let license = provider.get(&args.key)?;
            println!("{}", output.heading(&license.name));
            println!();
            print!("{}", license.body);
        }
    }
    Ok(())
}

fn format_list(output: &OutputConfig, licenses: &[LicenseSummary]) -> String {
    let width = licenses.iter().map(|l| l.key.len()).max().unwrap_or(0);
    licenses
        .iter()
        .map(|license| {
            format!(
                "{}  {}\n",
                output.heading(format!("{:<width$}", license.key, width = width)),
                license.name
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use kickoff::error::{Error, Result as KickoffResult};
    use kickoff::license::License;

    struct StaticProvider;

    impl LicenseProvider for StaticProvider {
        fn get(&self, key: &str) -> KickoffResult<License> {
            match key {
                "mit" => Ok(License {
                    key: "mit".to_string(),
                    name: "MIT License".to_string(),
                    body: "Copyright (c) [year] [fullname]\n".to_string(),
                }),
                _ => Err(Error::LicenseNotFound {
                    key: key.to_string(),
                }),
            }
        }

        fn list(&self) -> KickoffResult<Vec<LicenseSummary>> {
            Ok(vec![
                LicenseSummary {
                    key: "apache-2.0".to_string(),
                    name: "Apache License 2.0".to_string(),
                },
                LicenseSummary {
                    key: "mit".to_string(),
                    name: "MIT License".to_string(),
                },
            ])
        }
    }

    #[test]
    fn test_format_list_aligns_keys() {
        let licenses = StaticProvider.list().unwrap();
        let text = format_list(&OutputConfig::without_color(), &licenses);
        assert_eq!(
            text,
            "apache-2.0  Apache License 2.0\nmit         MIT License\n"
        );
    }

    #[test]
    fn test_show_unknown_license_fails() {
        let err = run(
            &StaticProvider,
            &OutputConfig::without_color(),
            LicenseCommand::Show(ShowArgs {
                key: "wtfpl".to_string(),
            }),
        )
        .unwrap_err();
        assert!(err.to_string().contains("wtfpl"));
    }

    #[test]
    fn test_show_known_license() {
        assert!(run(
            &StaticProvider,
            &OutputConfig::without_color(),
            LicenseCommand::Show(ShowArgs {
                key: "mit".to_string(),
            }),
        )
        .is_ok());
    }
}

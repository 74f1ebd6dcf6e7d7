//! Timetrack - command-line composition root.

use std::sync::Arc;

use anyhow::Context;
use chrono::NaiveDate;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use timetrack_client::infrastructure::{FileStorage, ReqwestTransport, SystemClock};
use timetrack_client::{ApiClient, ClientConfig};

const USAGE: &str = "Usage: timetrack <command>

Commands:
  login <email> <password>
  register <email> <password>
  projects
  log <project-id> <hours> <YYYY-MM-DD>
  logout
  status";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "timetrack_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = ClientConfig::from_env()?;
    tracing::debug!(
        backend = %config.backend_url,
        storage = ?config.storage_path,
        "Loaded configuration"
    );

    let client = ApiClient::new(
        Arc::new(ReqwestTransport::new(&config.backend_url)),
        Arc::new(FileStorage::open(&config.storage_path)),
        Arc::new(SystemClock::new()),
    );

    let args: Vec<String> = std::env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    match args.as_slice() {
        ["login", email, password] => {
            client.authenticate(email, password).await?;
            println!("Logged in as {email}");
        }
        ["register", email, password] => {
            client.register(email, password).await?;
            println!("Registered {email}. Run `timetrack login` to sign in.");
        }
        ["projects"] => {
            let projects = client.list_projects().await?;
            if projects.is_empty() {
                println!("No projects");
            }
            for project in projects {
                match (project.id(), project.name()) {
                    (Some(id), Some(name)) => println!("{id}\t{name}"),
                    _ => println!("{}", project.as_value()),
                }
            }
        }
        ["log", project_id, hours, date] => {
            let hours: f64 = hours
                .parse()
                .with_context(|| format!("hours must be a number, got {hours:?}"))?;
            let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .with_context(|| format!("date must be YYYY-MM-DD, got {date:?}"))?;
            let ack = client.submit_time_entry(project_id, hours, date).await?;
            println!("Logged {hours}h on {project_id} for {date}: {ack}");
        }
        ["logout"] => {
            client.logout().await?;
            println!("Logged out");
        }
        ["status"] => {
            if client.is_authenticated() {
                println!("Logged in ({})", config.backend_url);
            } else {
                println!("Not logged in");
            }
        }
        [] => anyhow::bail!("{USAGE}"),
        [cmd, ..] => anyhow::bail!("Unknown or malformed command: {cmd}\n\n{USAGE}"),
    }

    Ok(())
}

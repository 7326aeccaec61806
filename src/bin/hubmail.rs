use clap::{arg, command, value_parser, Command};
use hubmail::server::config::{config_to_toml, default_server_config};
use hubmail::server::server_runner::run_server;
use std::path::PathBuf;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let matches = command!()
        .subcommand(
            Command::new("server")
                .about("Run a notification server")
                .arg(
                    arg!(--config <FILE> "Path to the server's configuration file")
                        .value_parser(value_parser!(PathBuf))
                        .env("HUBMAIL_SERVER_CONFIG_FILE")
                        .default_value("./hubmail.toml"),
                ),
        )
        .subcommand(
            Command::new("default_server_config")
                .about("Print a default configuration file for a server"),
        )
        .get_matches();

    if let Some(matches) = matches.subcommand_matches("server") {
        if let Some(config) = matches.get_one::<PathBuf>("config") {
            run_server(config).await?;
        }
    } else if matches.subcommand_matches("default_server_config").is_some() {
        match config_to_toml(default_server_config()) {
            Ok(config) => println!("{config}"),
            Err(err) => println!("Error: {err}"),
        }
    }

    Ok(())
}

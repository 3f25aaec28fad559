use clap::Parser;

/// School records management service.
#[derive(Parser)]
#[command(name = "campus-api", version, about)]
struct Cli {
    /// SQLite database path, overriding the DATABASE_URL environment
    /// variable.
    #[arg(long)]
    database_url: Option<String>,

    /// Port to listen on, overriding the Rocket config.
    #[arg(long)]
    port: Option<u16>,
}

#[rocket::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    if let Some(url) = cli.database_url {
        std::env::set_var("DATABASE_URL", url);
    }
    if let Some(port) = cli.port {
        std::env::set_var("ROCKET_PORT", port.to_string());
    }

    campus_api::rocket()
        .launch()
        .await
        .expect("Rocket server failed to launch");
}

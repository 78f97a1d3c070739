use clap::{Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "vendor-cli")]
#[command(about = "Command-line client for the vendor portal API", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3000")]
    url: String,

    #[arg(short, long, env = "TEST_USER_EMAIL", default_value = "test@example.com")]
    email: String,

    #[arg(short, long, env = "TEST_USER_PASSWORD", default_value = "password123")]
    password: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and print the login response
    Login,
    /// Log in and show the session user
    Session,
    /// List vendors, optionally filtered
    List {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        tag: Option<String>,
    },
    /// Show one vendor
    Get { id: String },
    /// Register a vendor
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// Replace a vendor's fields
    Update {
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// Delete a vendor
    Delete { id: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::builder().cookie_store(true).build()?;
    let base = cli.url.trim_end_matches('/');

    // Every command runs inside a fresh session.
    let login = client
        .post(format!("{base}/api/auth/login"))
        .json(&json!({ "email": cli.email, "password": cli.password }))
        .send()
        .await?;
    if !login.status().is_success() {
        return print_response(login).await;
    }

    let res = match cli.command {
        Commands::Login => login,
        Commands::Session => client.get(format!("{base}/api/auth/session")).send().await?,
        Commands::List { search, tag } => {
            let mut query = Vec::new();
            if let Some(search) = search {
                query.push(("search", search));
            }
            if let Some(tag) = tag {
                query.push(("tag", tag));
            }
            client
                .get(format!("{base}/api/vendors"))
                .query(&query)
                .send()
                .await?
        }
        Commands::Get { id } => client.get(format!("{base}/api/vendors/{id}")).send().await?,
        Commands::Create { name, email, tags } => {
            client
                .post(format!("{base}/api/vendors"))
                .json(&json!({ "name": name, "email": email, "tags": tags }))
                .send()
                .await?
        }
        Commands::Update {
            id,
            name,
            email,
            tags,
        } => {
            client
                .put(format!("{base}/api/vendors/{id}"))
                .json(&json!({ "name": name, "email": email, "tags": tags }))
                .send()
                .await?
        }
        Commands::Delete { id } => {
            client
                .delete(format!("{base}/api/vendors/{id}"))
                .send()
                .await?
        }
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    if !status.is_success() {
        eprintln!("Error: API returned status {}", status);
        if !text.is_empty() {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    if text.is_empty() {
        println!("{}", status);
        return Ok(());
    }

    let json: Value = serde_json::from_str(&text)?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

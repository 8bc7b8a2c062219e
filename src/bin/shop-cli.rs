use clap::{Parser, Subcommand};
use online_shop::client::{ClientError, ShopClient};
use online_shop::store::Product;

#[derive(Parser)]
#[command(name = "shop-cli")]
#[command(about = "Command-line client for the online shop service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all products
    List,
    /// Show one product by name
    Info { name: String },
    /// Create a new product
    Create {
        name: String,
        code: String,
        category: String,
    },
    /// Replace the product named OLD_NAME
    Change {
        old_name: String,
        name: String,
        code: String,
        category: String,
    },
    /// Delete a product by name
    Delete { name: String },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let client = ShopClient::new(&cli.url);

    let result = match cli.command {
        Commands::List => client
            .list()
            .await
            .map(|products| print_json(&products)),
        Commands::Info { name } => client
            .info(&name)
            .await
            .map(|product| print_json(&product)),
        Commands::Create {
            name,
            code,
            category,
        } => client.create(&Product::new(name, code, category)).await,
        Commands::Change {
            old_name,
            name,
            code,
            category,
        } => {
            client
                .change(&old_name, &Product::new(name, code, category))
                .await
        }
        Commands::Delete { name } => client.delete(&name).await,
    };

    if let Err(e) = result {
        report(&e);
        std::process::exit(1);
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(e) => eprintln!("Error: failed to format response: {}", e),
    }
}

fn report(err: &ClientError) {
    match err {
        ClientError::Status { status, message } => {
            eprintln!("Error: shop API returned status {}", status);
            if !message.is_empty() {
                eprintln!("Response: {}", message);
            }
        }
        ClientError::Http(e) => eprintln!("Error: {}", e),
    }
}

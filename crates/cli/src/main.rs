use clap::{Parser, Subcommand};
use catalogue_core::{CoreConfig, ImageUpload, Product, ProductFields, ProductService};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "catalogue")]
#[command(about = "Product catalogue CLI")]
struct Cli {
    /// Product data file (overrides CATALOGUE_DATA_FILE)
    #[arg(long, global = true)]
    data_file: Option<String>,
    /// Image upload directory (overrides CATALOGUE_UPLOAD_DIR)
    #[arg(long, global = true)]
    upload_dir: Option<String>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List all products
    List,
    /// Show a single product
    Show {
        /// Product id
        id: u64,
    },
    /// Add a product
    Add {
        #[arg(long)]
        name: String,
        /// Price, for example 9.99
        #[arg(long)]
        price: String,
        #[arg(long)]
        quantity: String,
        #[arg(long)]
        description: Option<String>,
        /// Image file to attach
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Update the given fields of a product
    Update {
        /// Product id
        id: u64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        price: Option<String>,
        #[arg(long)]
        quantity: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Replacement image file
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Delete a product and its image
    Delete {
        /// Product id
        id: u64,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let cfg = CoreConfig::from_env_values(
        cli.data_file.or_else(|| std::env::var("CATALOGUE_DATA_FILE").ok()),
        cli.upload_dir
            .or_else(|| std::env::var("CATALOGUE_UPLOAD_DIR").ok()),
        std::env::var("CATALOGUE_MAX_UPLOAD_BYTES").ok(),
    )?;
    let service = ProductService::new(&cfg);

    match cli.command {
        Some(Commands::List) => match service.list() {
            Ok(products) if products.is_empty() => println!("No products found."),
            Ok(products) => {
                for product in &products {
                    println!("{}", format_product(product));
                }
            }
            Err(e) => eprintln!("Error listing products: {}", e),
        },
        Some(Commands::Show { id }) => match service.get(id) {
            Ok(product) => {
                println!("{}", format_product(&product));
                if !product.description.is_empty() {
                    println!("  {}", product.description);
                }
            }
            Err(e) => eprintln!("Error showing product {}: {}", id, e),
        },
        Some(Commands::Add {
            name,
            price,
            quantity,
            description,
            image,
        }) => {
            let fields = ProductFields {
                name: Some(name),
                price: Some(price),
                quantity: Some(quantity),
                description,
            };
            let image = image.as_deref().map(read_image).transpose()?;
            match service.create(fields, image) {
                Ok(product) => println!("Added product with ID: {}", product.id),
                Err(e) => eprintln!("Error adding product: {}", e),
            }
        }
        Some(Commands::Update {
            id,
            name,
            price,
            quantity,
            description,
            image,
        }) => {
            let fields = ProductFields {
                name,
                price,
                quantity,
                description,
            };
            let image = image.as_deref().map(read_image).transpose()?;
            match service.update(id, fields, image) {
                Ok(product) => println!("Updated {}", format_product(&product)),
                Err(e) => eprintln!("Error updating product {}: {}", id, e),
            }
        }
        Some(Commands::Delete { id }) => match service.delete(id) {
            Ok(()) => println!("Deleted product with ID: {}", id),
            Err(e) => eprintln!("Error deleting product {}: {}", id, e),
        },
        None => {
            println!("Use 'catalogue --help' for commands");
        }
    }

    Ok(())
}

fn format_product(product: &Product) -> String {
    let image = product.image.as_deref().unwrap_or("-");
    format!(
        "ID: {}, Name: {}, Price: {}, Quantity: {}, Image: {}",
        product.id, product.name, product.price, product.quantity, image
    )
}

/// Reads an image from disk, proposing its own file name for storage.
fn read_image(path: &Path) -> std::io::Result<ImageUpload> {
    let data = std::fs::read(path)?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(ImageUpload { filename, data })
}

use anyhow::Context;
use board_client::{ClientConfig, RestStore};
use board_engine::{BoardSession, BoardSnapshot, CategoryAdded, SessionConfig};
use clap::{Parser, Subcommand};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "board", author, version, about = "Plan content on your board", long_about = None)]
struct Cli {
    /// Owner whose board is loaded
    #[arg(long, env = "BOARD_OWNER_ID")]
    owner: Uuid,

    #[arg(long, env = "BOARD_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the board
    Show,
    /// Append a category
    AddCategory { name: String },
    RenameCategory { id: Uuid, name: String },
    /// Delete a category; its topics move to General
    DeleteCategory { id: Uuid },
    /// Append a topic to a category
    AddTopic { category: Uuid, title: String },
    RenameTopic { id: Uuid, title: String },
    /// Flip a topic's completion
    Toggle { id: Uuid },
    DeleteTopic { id: Uuid },
    /// Move a topic to a position in a category
    MoveTopic {
        id: Uuid,
        category: Uuid,
        #[arg(default_value_t = 0)]
        index: i32,
    },
    /// Set the category order, listing every category id
    ReorderCategories {
        #[arg(required = true)]
        ids: Vec<Uuid>,
    },
    /// Set a category's topic order, listing every topic id
    ReorderTopics {
        category: Uuid,
        #[arg(required = true)]
        ids: Vec<Uuid>,
    },
    /// Close order gaps left behind by interrupted edits
    Normalize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    board_engine::logger::init_logger(&cli.log_level, cli.json_logs)?;

    let config = ClientConfig::from_env()?;
    let store = RestStore::new(&config)?;
    let session = BoardSession::spawn(store, SessionConfig::from_env());

    session
        .load(cli.owner)
        .await
        .context("Failed to load board")?;
    tracing::info!(owner = %cli.owner, "Board ready");

    run(&session, cli.command).await?;

    print_board(&session.snapshot());
    Ok(())
}

async fn run(session: &BoardSession, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Show => {}
        Commands::AddCategory { name } => {
            if let CategoryAdded::DefaultExists = session.add_category(name).await? {
                println!("General already exists");
            }
        }
        Commands::RenameCategory { id, name } => {
            session.rename_category(id, name).await?;
        }
        Commands::DeleteCategory { id } => {
            let moved = session.delete_category(id).await?;
            if moved > 0 {
                println!("Moved {} topic(s) to General", moved);
            }
        }
        Commands::AddTopic { category, title } => {
            session.add_topic(category, title).await?;
        }
        Commands::RenameTopic { id, title } => {
            session.rename_topic(id, title).await?;
        }
        Commands::Toggle { id } => {
            session.toggle_completion(id).await?;
        }
        Commands::DeleteTopic { id } => {
            session.delete_topic(id).await?;
        }
        Commands::MoveTopic { id, category, index } => {
            session.move_topic(id, category, index).await?;
        }
        Commands::ReorderCategories { ids } => {
            session.reorder_categories(ids).await?;
        }
        Commands::ReorderTopics { category, ids } => {
            session.reorder_topics_within_category(category, ids).await?;
        }
        Commands::Normalize => {
            let changed = session.normalize_orders().await?;
            println!("Normalized {} order(s)", changed);
        }
    }
    Ok(())
}

fn print_board(snapshot: &BoardSnapshot) {
    for (category, topics) in snapshot.board() {
        println!("{}. {}  ({})", category.sort_order, category.name, category.id);
        for topic in topics {
            let mark = if topic.completed { "x" } else { " " };
            println!("    [{}] {}  ({})", mark, topic.title, topic.id);
        }
    }
}

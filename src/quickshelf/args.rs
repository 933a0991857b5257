use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "quickshelf")]
#[command(about = "Local-first inventory tracker for the command line", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add an item to the shelf
    #[command(alias = "a")]
    Add {
        /// Name of the item
        title: String,

        /// Where the item is kept (e.g. "Box A")
        #[arg(short, long)]
        location: Option<String>,

        /// Free-text category tag
        #[arg(short, long)]
        category: Option<String>,

        /// URI of a photo of the item, stored as-is
        #[arg(short, long)]
        image: Option<String>,
    },

    /// List items
    #[command(alias = "ls")]
    List {
        /// Substring to search titles and locations for
        #[arg(short, long)]
        search: Option<String>,

        /// Only show items tagged with this location or category
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// Show one item in full
    #[command(alias = "v")]
    View {
        /// Position of the item in the list (1-based)
        position: usize,
    },

    /// Change fields of an item
    #[command(alias = "e")]
    Edit {
        /// Position of the item in the list (1-based)
        position: usize,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(short, long)]
        location: Option<String>,

        #[arg(short, long, conflicts_with = "no_category")]
        category: Option<String>,

        /// Clear the category tag
        #[arg(long)]
        no_category: bool,

        #[arg(short, long, conflicts_with = "no_image")]
        image: Option<String>,

        /// Clear the photo reference
        #[arg(long)]
        no_image: bool,
    },

    /// Delete an item (offers an immediate undo)
    #[command(alias = "rm")]
    Delete {
        /// Position of the item in the list (1-based)
        position: usize,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Move an item to a new position
    #[command(alias = "mv")]
    Move {
        /// Position to move from (1-based)
        from: usize,

        /// Position to move to (1-based)
        to: usize,
    },

    /// Print the locations the filter offers
    Locations,

    /// Get or set configuration
    Config {
        /// Configuration key (e.g., confirm-delete)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}

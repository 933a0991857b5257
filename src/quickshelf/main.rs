use clap::Parser;
use colored::*;
use directories::ProjectDirs;
use quickshelf::config::ShelfConfig;
use quickshelf::error::{Result, ShelfError};
use quickshelf::model::{Item, ItemDraft, ItemPatch};
use quickshelf::repo::{CmdMessage, ItemRepository, MessageLevel};
use quickshelf::store::fs::FileStore;
use quickshelf::view::{self, DisplayItem, TagFilter};
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use unicode_width::UnicodeWidthStr;
use uuid::Uuid;

mod args;
use args::{Cli, Commands};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

struct AppContext {
    repo: ItemRepository<FileStore>,
    config: ShelfConfig,
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let mut ctx = init_context();

    match cli.command {
        Some(Commands::Add {
            title,
            location,
            category,
            image,
        }) => handle_add(&mut ctx, title, location, category, image),
        Some(Commands::List { search, filter }) => handle_list(&ctx, search, filter),
        Some(Commands::View { position }) => handle_view(&ctx, position),
        Some(Commands::Edit {
            position,
            title,
            location,
            category,
            no_category,
            image,
            no_image,
        }) => handle_edit(
            &mut ctx,
            position,
            title,
            location,
            category,
            no_category,
            image,
            no_image,
        ),
        Some(Commands::Delete { position, yes }) => handle_delete(&mut ctx, position, yes),
        Some(Commands::Move { from, to }) => handle_move(&mut ctx, from, to),
        Some(Commands::Locations) => handle_locations(&ctx),
        Some(Commands::Config { key, value }) => handle_config(&mut ctx, key, value),
        None => handle_list(&ctx, None, None),
    }
}

fn data_dir() -> PathBuf {
    // QUICKSHELF_DATA overrides the OS data directory (primarily for testing)
    if let Ok(dir) = std::env::var("QUICKSHELF_DATA") {
        return PathBuf::from(dir);
    }
    let proj_dirs = ProjectDirs::from("com", "quickshelf", "quickshelf")
        .expect("Could not determine data dir");
    proj_dirs.data_dir().to_path_buf()
}

fn init_context() -> AppContext {
    let dir = data_dir();
    let config = ShelfConfig::load(&dir).unwrap_or_default();
    let store = FileStore::new(dir);
    let mut repo = ItemRepository::new(store);
    // Each invocation is one "focus" of the list: pull whatever is persisted
    repo.reload();
    AppContext { repo, config }
}

fn item_at(ctx: &AppContext, position: usize) -> Result<Item> {
    position
        .checked_sub(1)
        .and_then(|i| ctx.repo.items().get(i))
        .cloned()
        .ok_or_else(|| ShelfError::Validation(format!("No item at position {}", position)))
}

fn handle_add(
    ctx: &mut AppContext,
    title: String,
    location: Option<String>,
    category: Option<String>,
    image: Option<String>,
) -> Result<()> {
    let result = ctx.repo.add(ItemDraft {
        title,
        location: location.unwrap_or_default(),
        category,
        image,
    })?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_list(ctx: &AppContext, search: Option<String>, filter: Option<String>) -> Result<()> {
    let filter = filter
        .map(|label| TagFilter::from_label(&label))
        .unwrap_or(TagFilter::All);
    let search = search.unwrap_or_default();

    let listed = view::visible_items(ctx.repo.items(), &search, &filter);
    print_items(&listed);
    Ok(())
}

fn handle_view(ctx: &AppContext, position: usize) -> Result<()> {
    let item = item_at(ctx, position)?;

    println!("{} {}", position.to_string().yellow(), item.title.bold());
    println!("--------------------------------");
    println!("{} {}", label("Location:"), or_dash(&item.location));
    println!(
        "{} {}",
        label("Category:"),
        item.category.as_deref().unwrap_or("-")
    );
    println!(
        "{} {}",
        label("Image:"),
        item.image.as_deref().unwrap_or("-")
    );
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn handle_edit(
    ctx: &mut AppContext,
    position: usize,
    title: Option<String>,
    location: Option<String>,
    category: Option<String>,
    no_category: bool,
    image: Option<String>,
    no_image: bool,
) -> Result<()> {
    if title.is_none()
        && location.is_none()
        && category.is_none()
        && !no_category
        && image.is_none()
        && !no_image
    {
        println!("Nothing to change.");
        return Ok(());
    }

    let item = item_at(ctx, position)?;
    let patch = ItemPatch {
        title,
        location,
        category: if no_category {
            Some(None)
        } else {
            category.map(Some)
        },
        image: if no_image { Some(None) } else { image.map(Some) },
    };

    let result = ctx.repo.edit(item.id, patch)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_delete(ctx: &mut AppContext, position: usize, yes: bool) -> Result<()> {
    let item = item_at(ctx, position)?;

    if ctx.config.confirm_delete && !yes {
        print!("Delete '{}'? [y/N] ", item.title);
        io::stdout().flush().map_err(ShelfError::Io)?;

        let mut input = String::new();
        io::stdin().read_line(&mut input).map_err(ShelfError::Io)?;

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Operation cancelled.");
            return Ok(());
        }
    }

    let result = ctx.repo.delete(item.id)?;
    print_messages(&result.messages);

    // The one-shot undo window, while this process still holds the buffer
    if io::stdin().is_terminal() {
        print!("Undo? [y/N] ");
        io::stdout().flush().map_err(ShelfError::Io)?;

        let mut input = String::new();
        io::stdin().read_line(&mut input).map_err(ShelfError::Io)?;

        if input.trim().eq_ignore_ascii_case("y") {
            let result = ctx.repo.undo_delete();
            print_messages(&result.messages);
        }
    }
    Ok(())
}

fn handle_move(ctx: &mut AppContext, from: usize, to: usize) -> Result<()> {
    let count = ctx.repo.items().len();
    if from == 0 || to == 0 || from > count || to > count {
        return Err(ShelfError::Validation(format!(
            "Positions must be between 1 and {}",
            count
        )));
    }

    let mut order: Vec<Uuid> = ctx.repo.items().iter().map(|i| i.id).collect();
    let id = order.remove(from - 1);
    order.insert(to - 1, id);

    let result = ctx.repo.reorder(&order)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_locations(ctx: &AppContext) -> Result<()> {
    for option in view::filter_options(ctx.repo.items()) {
        println!("{}", option);
    }
    Ok(())
}

fn handle_config(ctx: &mut AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    match (key.as_deref(), value) {
        (None, _) | (Some("confirm-delete"), None) => {
            println!("confirm-delete = {}", ctx.config.confirm_delete);
        }
        (Some("confirm-delete"), Some(v)) => {
            let parsed: bool = v
                .parse()
                .map_err(|_| ShelfError::Validation(format!("Not a boolean: {}", v)))?;
            ctx.config.confirm_delete = parsed;
            ctx.config.save(data_dir())?;
            println!("confirm-delete = {}", ctx.config.confirm_delete);
        }
        (Some(other), _) => {
            println!("Unknown config key: {}", other);
        }
    }
    Ok(())
}

fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

const LINE_WIDTH: usize = 100;
const TAG_WIDTH: usize = 18;
const PHOTO_MARKER: &str = "📷";

fn print_items(items: &[DisplayItem]) {
    if items.is_empty() {
        println!("No items found.");
        return;
    }

    for di in items {
        let idx_str = format!("{}. ", di.position);

        let mut title_label = match &di.item.category {
            Some(category) => format!("{} ({})", di.item.title, category),
            None => di.item.title.clone(),
        };
        if di.item.image.is_some() {
            title_label.push(' ');
            title_label.push_str(PHOTO_MARKER);
        }

        let fixed_width = idx_str.width() + TAG_WIDTH;
        let available = LINE_WIDTH.saturating_sub(fixed_width);
        let title_display = truncate_to_width(&title_label, available);
        let padding = available.saturating_sub(title_display.width());

        let location = format!("{:>width$}", di.item.location, width = TAG_WIDTH);

        println!(
            "{}{}{}{}",
            idx_str,
            title_display,
            " ".repeat(padding),
            location.dimmed()
        );
    }
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    use unicode_width::UnicodeWidthChar;

    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}

fn label(text: &str) -> ColoredString {
    format!("{:<9}", text).dimmed()
}

fn or_dash(text: &str) -> &str {
    if text.is_empty() {
        "-"
    } else {
        text
    }
}

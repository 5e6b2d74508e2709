use clap::Parser;
use colored::*;
use eyre::{Context, Result, eyre};
use todostore::{Config, DateKey, DatedStore, DueEdit, FlatStore, Item, ItemStore, Layout, Partitioning, Storage};
use tracing_subscriber::EnvFilter;

mod cli;

use cli::{Cli, Command, DateArg, parse_month};

type Store<P> = ItemStore<P, Box<dyn Storage>>;

fn setup_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();
}

fn format_item(index: usize, item: &Item, today: DateKey) -> String {
    let due = match item.due() {
        Some(due) if due < today => format!(" (due {})", due).red(),
        Some(due) => format!(" (due {})", due).yellow(),
        None => "".normal(),
    };
    format!("{:>3}  {}{}", index.to_string().cyan(), item.text(), due)
}

fn print_list(label: &str, items: &[Item]) {
    println!("{} {}", "→".blue(), label.bold());
    if items.is_empty() {
        println!("  {}", "No items".dimmed());
        return;
    }

    let today = DateKey::today();
    for (index, item) in items.iter().enumerate() {
        println!("{}", format_item(index, item, today));
    }
}

fn report(changed: bool, message: String) {
    if changed {
        println!("{} {}", "✓".green(), message);
    } else {
        println!("{}", "Nothing changed".dimmed());
    }
}

/// The date argument carried by list-level commands
fn date_arg(command: &Command) -> Option<DateArg> {
    match command {
        Command::Add { date, .. }
        | Command::List { date }
        | Command::Remove { date, .. }
        | Command::Move { date, .. }
        | Command::Edit { date, .. } => Some(*date),
        Command::Calendar { .. } | Command::Dates => None,
    }
}

/// Execute one list-level command against the list for `key`
fn run_list_command<P: Partitioning>(store: &mut Store<P>, key: &P::Key, label: &str, command: Command) -> Result<()> {
    match command {
        Command::Add { text, due, .. } => match store.add(key, &text, due)? {
            Some(item) => println!("{} Added: {} {}", "✓".green(), item.text(), item.id().dimmed()),
            None => println!("{}", "Nothing added: text is empty".dimmed()),
        },

        Command::List { .. } => print_list(label, store.list(key)),

        Command::Remove { index, .. } => {
            let text = store.get(key, index).map(|item| item.text().to_string());
            let changed = store.remove(key, index)?;
            report(changed, format!("Removed: {}", text.unwrap_or_default()));
        }

        Command::Move { from, to, .. } => {
            let changed = store.move_item(key, from, to)?;
            report(changed, format!("Moved {} to {}", from, to));
            if changed {
                print_list(label, store.list(key));
            }
        }

        Command::Edit {
            index,
            text,
            due,
            clear_due,
            ..
        } => {
            let due = match (due, clear_due) {
                (_, true) => DueEdit::Cleared,
                (Some(date), false) => DueEdit::Set(date),
                (None, false) => DueEdit::Unchanged,
            };
            let changed = store.edit(key, index, &text, due)?;
            report(changed, format!("Edited item {}", index));
        }

        Command::Calendar { .. } | Command::Dates => {
            return Err(eyre!("This command requires the by_date layout"));
        }
    }

    Ok(())
}

fn run_flat(store: &mut Store<todostore::Flat>, command: Command) -> Result<()> {
    run_list_command(store, &(), "All items", command)
}

fn run_dated(store: &mut Store<todostore::ByDate>, command: Command) -> Result<()> {
    match command {
        Command::Calendar { month } => {
            let today = DateKey::today();
            let (year, month) = match month {
                Some(s) => parse_month(&s).ok_or_else(|| eyre!("Invalid month {:?}, expected yyyy-mm", s))?,
                None => (today.year(), today.month()),
            };

            let counts = store.counts_in_month(year, month);
            println!("{} {}-{:02}", "→".blue(), year, month);
            if counts.is_empty() {
                println!("  {}", "No items this month".dimmed());
            }
            for (date, count) in counts {
                let marker = if date == today { "*" } else { " " };
                println!(" {}{}  {} item(s)", marker, date.to_string().cyan(), count);
            }
            Ok(())
        }

        Command::Dates => {
            let counts = store.count_by_date();
            if counts.is_empty() {
                println!("{}", "No items found".dimmed());
            }
            for (date, count) in counts {
                println!("{}  {} item(s)", date.to_string().cyan(), count);
            }
            Ok(())
        }

        command => {
            let key = date_arg(&command).map(DateArg::or_today).unwrap_or_else(DateKey::today);
            run_list_command(store, &key, &key.to_string(), command)
        }
    }
}

fn main() -> Result<()> {
    setup_logging();

    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref()).context("Failed to load config")?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }

    let storage = config.open_storage().context("Failed to open storage")?;

    match config.layout {
        Layout::Flat => {
            let mut store = FlatStore::open(storage);
            run_flat(&mut store, cli.command)
        }
        Layout::ByDate => {
            let mut store = DatedStore::open(storage);
            run_dated(&mut store, cli.command)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use todostore::{ByDate, Flat, MemoryStorage};

    fn command(args: &[&str]) -> Command {
        Cli::parse_from(std::iter::once("todostore").chain(args.iter().copied())).command
    }

    fn flat_store() -> Store<Flat> {
        FlatStore::open(Box::new(MemoryStorage::new()) as Box<dyn Storage>)
    }

    fn dated_store() -> Store<ByDate> {
        DatedStore::open(Box::new(MemoryStorage::new()) as Box<dyn Storage>)
    }

    fn texts(items: &[Item]) -> Vec<&str> {
        items.iter().map(|item| item.text()).collect()
    }

    #[test]
    fn test_date_arg_only_for_list_commands() {
        let date = DateKey::from_ymd(2024, 3, 5);

        let arg = date_arg(&command(&["list", "--date", "2024-03-05"]));
        assert_eq!(arg.and_then(|arg| arg.date), date);

        let arg = date_arg(&command(&["remove", "0"]));
        assert!(arg.is_some_and(|arg| arg.date.is_none()));

        assert!(date_arg(&command(&["calendar"])).is_none());
        assert!(date_arg(&command(&["dates"])).is_none());
    }

    #[test]
    fn test_flat_ignores_date_flag() {
        let mut store = flat_store();

        run_flat(&mut store, command(&["add", "buy milk", "--date", "2024-03-05"])).unwrap();
        run_flat(&mut store, command(&["add", "call mom"])).unwrap();
        assert_eq!(texts(store.list(&())), vec!["buy milk", "call mom"]);

        run_flat(&mut store, command(&["move", "0", "1", "--date", "1999-01-01"])).unwrap();
        assert_eq!(texts(store.list(&())), vec!["call mom", "buy milk"]);
    }

    #[test]
    fn test_flat_rejects_calendar_commands() {
        let mut store = flat_store();

        assert!(run_flat(&mut store, command(&["calendar"])).is_err());
        assert!(run_flat(&mut store, command(&["dates"])).is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn test_dated_routes_to_requested_date() {
        let mut store = dated_store();
        let date = DateKey::from_ymd(2024, 3, 5).unwrap();

        run_dated(&mut store, command(&["add", "dentist", "--date", "2024-03-05"])).unwrap();
        run_dated(&mut store, command(&["add", "pharmacy", "--date", "2024-03-05"])).unwrap();
        assert_eq!(texts(store.list(&date)), vec!["dentist", "pharmacy"]);
        assert_eq!(store.total_len(), 2);

        run_dated(
            &mut store,
            command(&["edit", "1", "pharmacy run", "--due", "2024-03-06", "--date", "2024-03-05"]),
        )
        .unwrap();
        let item = store.get(&date, 1).unwrap();
        assert_eq!(item.text(), "pharmacy run");
        assert_eq!(item.due(), DateKey::from_ymd(2024, 3, 6));

        run_dated(&mut store, command(&["edit", "1", "pharmacy run", "--clear-due", "--date", "2024-03-05"])).unwrap();
        assert_eq!(store.get(&date, 1).unwrap().due(), None);

        run_dated(&mut store, command(&["remove", "0", "--date", "2024-03-05"])).unwrap();
        assert_eq!(texts(store.list(&date)), vec!["pharmacy run"]);
    }

    #[test]
    fn test_dated_defaults_to_today() {
        let mut store = dated_store();

        run_dated(&mut store, command(&["add", "water plants"])).unwrap();
        assert_eq!(texts(store.list(&DateKey::today())), vec!["water plants"]);
    }

    #[test]
    fn test_dated_calendar_commands() {
        let mut store = dated_store();
        run_dated(&mut store, command(&["add", "dentist", "--date", "2024-03-05"])).unwrap();

        assert!(run_dated(&mut store, command(&["calendar", "--month", "2024-03"])).is_ok());
        assert!(run_dated(&mut store, command(&["calendar", "--month", "2024-13"])).is_err());
        assert!(run_dated(&mut store, command(&["dates"])).is_ok());
    }
}

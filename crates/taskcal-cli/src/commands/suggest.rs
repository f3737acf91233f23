use clap::Subcommand;
use taskcal_core::suggest_importance;

use crate::storage::TaskStore;

#[derive(Subcommand)]
pub enum SuggestAction {
    /// Suggest an importance score from a description
    Importance {
        /// Task description
        text: String,
        /// Write the suggestion to this task
        #[arg(long)]
        apply: Option<String>,
    },
}

pub fn run(action: SuggestAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        SuggestAction::Importance { text, apply } => {
            let importance = suggest_importance(&text);
            println!("{}", importance.value());

            if let Some(id) = apply {
                let store = TaskStore::open()?;
                let mut book = store.load()?;
                book.apply_importance(&id, importance)?;
                store.save(&book)?;
                println!("Task updated: {id}");
            }
        }
    }
    Ok(())
}

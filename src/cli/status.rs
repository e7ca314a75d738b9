//! `status` command: inspect the persisted monitor state.

use colored::Colorize;

use crate::config;
use crate::state::StateStore;
use crate::Result;

pub fn run(json: bool) -> Result<()> {
    print_status(&StateStore::new(config::state_file_from_env()), json)
}

fn print_status(store: &StateStore, json: bool) -> Result<()> {
    let Some(state) = store.load()? else {
        if json {
            println!("{{\"error\": \"no_state\"}}");
        } else {
            println!("{}", "No state recorded yet. Run a check first.".yellow());
        }
        return Ok(());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&state)?);
    } else {
        println!("{}", "Monitor state".cyan().bold());
        println!();
        println!("   URL:          {}", state.url);
        match &state.hash {
            Some(hash) => println!("   Fingerprint:  {}", hash),
            None => println!("   Fingerprint:  {}", "none".bright_black()),
        }
        println!("   Last checked: {}", state.last_checked);
        match &state.last_changed {
            Some(changed) => println!("   Last changed: {}", changed),
            None => println!("   Last changed: {}", "never".bright_black()),
        }
    }

    Ok(())
}

//! Glam Studio main entrypoint.

use glamstudio::run;
use glamstudio::ui::messages::error;

fn main() {
    if let Err(e) = run() {
        error(format!("Error: {e}"));
        std::process::exit(1);
    }
}

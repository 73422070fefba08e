//! Print the feed for the current learner.
//!
//! Reads content from `JEELS_CONTENT_URL` or `JEELS_CONTENT_DIR` and learner
//! records from `JEELS_DATA_DIR` (a `.env` file works too).
//!
//! ```text
//! JEELS_CONTENT_DIR=./public cargo run --example feed
//! ```

use jeels::feed::{LessonScript, Part, PlaybackSync};
use jeels::lesson::group_catalog;
use jeels::{AppContext, Config, LessonStatus};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "jeels=info".into()))
        .init();

    let config = Config::from_env()?;
    let app = AppContext::from_config(&config);

    let index = app.lessons.ensure_index_loaded().await;
    println!("=== Catalog ({} lessons) ===", index.len());
    for group in group_catalog(&index, "") {
        println!("{}", group.group);
        for topic in &group.topics {
            println!("  - {topic}");
        }
    }

    let queue = app.learning_queue();
    let Some(meta) = queue.current() else {
        println!("\nNothing to learn yet.");
        return Ok(());
    };

    println!("\n=== Now playing: {meta} ===");
    app.lessons.ensure_loaded(&meta).await;
    let content = match app.lessons.status(&meta.key()) {
        LessonStatus::Ready(content) => content,
        LessonStatus::Failed(message) => {
            println!("Error: {message}");
            return Ok(());
        }
        _ => return Ok(()),
    };

    let script = LessonScript::from_content(&content);
    let mut sync = PlaybackSync::new(&script);
    let lines: Vec<&str> = script.lines().collect();

    // Pretend each track runs one second per line and sample it.
    let tracks = [
        (Part::General, script.general.len()),
        (Part::Practice, script.practice.len()),
    ];
    for (part, count) in tracks {
        let duration = count as f64;
        sync.set_duration(part, duration);
        for second in 0..count {
            if let Some(position) = sync.on_time_update(part, second as f64 + 0.5, duration) {
                let line = position.active_index.map(|i| lines[i]).unwrap_or("");
                println!("[{:>3}%] {line}", position.progress);
            }
        }
        if part == Part::General {
            sync.on_general_ended();
        }
    }

    if app.hard.is_hard(&meta.key()) {
        println!("(marked hard)");
    }
    Ok(())
}

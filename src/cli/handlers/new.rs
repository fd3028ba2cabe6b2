//! New zettel command handler.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use std::path::Path;
use tracing::info;

use crate::cli::NewArgs;
use crate::cli::config::Config;
use crate::domain::{Entropy, IdScheme, Tag, ZettelId};
use crate::infra::DirectoryStore;

/// Everything needed to write a new zettel (for testability).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewZettelPlan {
    pub id: ZettelId,
    pub title: String,
    pub date: NaiveDate,
    pub tags: Vec<Tag>,
}

/// Plans a new zettel from the given arguments (pure function, no I/O).
///
/// The title defaults to the custom ID text when one is given.
///
/// # Errors
///
/// Returns an error if:
/// - A custom ID title slugifies to nothing
/// - Any tag is invalid
pub fn plan_new_zettel<E: Entropy + ?Sized>(
    scheme: &IdScheme,
    title: Option<&str>,
    tag_strs: &[String],
    now: DateTime<Utc>,
    entropy: &mut E,
) -> Result<NewZettelPlan> {
    let mut tags = Vec::new();
    for tag_str in tag_strs {
        let tag = Tag::new(tag_str).with_context(|| format!("invalid tag '{}'", tag_str))?;
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }

    let id = ZettelId::generate(scheme, now, entropy).context("failed to generate zettel ID")?;

    let title = match (title, scheme) {
        (Some(t), _) => t.trim().to_string(),
        (None, IdScheme::Custom(text)) => text.trim().to_string(),
        (None, IdScheme::Hash) => String::new(),
    };

    Ok(NewZettelPlan {
        id,
        title,
        date: now.date_naive(),
        tags,
    })
}

pub fn handle_new(args: &NewArgs, notes_dir: &Path, config: &Config) -> Result<()> {
    let scheme = config.id_scheme(args.id_title.as_deref(), args.title.as_deref());
    let plan = plan_new_zettel(
        &scheme,
        args.title.as_deref(),
        &args.tags,
        Utc::now(),
        &mut rand::thread_rng(),
    )?;

    std::fs::create_dir_all(notes_dir)
        .with_context(|| format!("failed to create directory {}", notes_dir.display()))?;
    let mut store = DirectoryStore::open(notes_dir)
        .with_context(|| format!("failed to open zettelkasten at {}", notes_dir.display()))?;

    let path = store
        .create_note(&plan.id, &plan.title, Some(plan.date), &plan.tags, "")
        .with_context(|| format!("failed to create zettel {}", plan.id))?;

    info!(id = %plan.id, "created zettel");
    println!("{}", path.display());
    Ok(())
}

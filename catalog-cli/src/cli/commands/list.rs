//! List command handler

use anyhow::{Context, Result};
use colored::*;
use serde::Serialize;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::cli::ListArgs;
use crate::services::catalog::{CatalogService, filter};

/// Widest description shown before truncation
const DESCRIPTION_WIDTH: usize = 48;

/// One listed item, as printed with --json
#[derive(Debug, Serialize)]
struct ListedItem<'a> {
    seq: u64,
    descricao: &'a str,
    quantidade: u64,
    image: Option<String>,
}

pub fn handle_list_command(service: &mut CatalogService, args: ListArgs) -> Result<()> {
    let outcome = service.snapshot();
    if let Some(warning) = &outcome.warning {
        eprintln!("{} {}", "warning:".yellow().bold(), warning);
    }

    let query = args.filter.as_deref().unwrap_or("");
    let view = filter(&outcome.snapshot, query);
    log::debug!("{} of {} items match '{}'", view.len(), outcome.snapshot.len(), query);

    let images = service.image_index();
    let items: Vec<ListedItem> = view
        .records()
        .iter()
        .map(|r| ListedItem {
            seq: r.seq,
            descricao: &r.descricao,
            quantidade: r.quantidade,
            image: images
                .get(r.seq)
                .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned())),
        })
        .collect();

    if args.json {
        let json = serde_json::to_string_pretty(&items).context("Failed to serialize items")?;
        println!("{}", json);
        return Ok(());
    }

    if items.is_empty() {
        if outcome.snapshot.is_empty() {
            println!("{}", "No items in the catalog yet.".dimmed());
        } else {
            println!("{}", format!("No items match '{}'.", query).dimmed());
        }
        return Ok(());
    }

    let seq_width = items
        .iter()
        .map(|i| i.seq.to_string().len())
        .max()
        .unwrap_or(1)
        .max(3);
    let desc_width = items
        .iter()
        .map(|i| i.descricao.width().min(DESCRIPTION_WIDTH))
        .max()
        .unwrap_or(0)
        .max("DESCRIPTION".len());

    println!(
        "{}  {}  {:>5}  {}",
        pad("SEQ", seq_width).bold(),
        pad("DESCRIPTION", desc_width).bold(),
        "QTY".bold(),
        "IMAGE".bold()
    );

    for item in &items {
        let image = match &item.image {
            Some(name) => name.normal(),
            None => "(no image)".dimmed(),
        };
        println!(
            "{}  {}  {:>5}  {}",
            pad(&item.seq.to_string(), seq_width).cyan(),
            pad(&truncate(item.descricao, DESCRIPTION_WIDTH), desc_width),
            item.quantidade,
            image
        );
    }

    println!();
    println!(
        "{} of {} items in {}",
        items.len(),
        outcome.snapshot.len(),
        service.catalog_path().display().to_string().dimmed()
    );
    Ok(())
}

/// Pad to a display width (wide characters count double)
fn pad(s: &str, width: usize) -> String {
    let fill = width.saturating_sub(s.width());
    format!("{}{}", s, " ".repeat(fill))
}

/// Cut a string to at most `max` display columns, marking the cut with "…"
fn truncate(s: &str, max: usize) -> String {
    if s.width() <= max {
        return s.to_string();
    }

    let mut out = String::new();
    let mut used = 0;
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

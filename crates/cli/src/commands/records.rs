// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Record commands: send, upload, list, show, delete.

use std::path::Path;

use crate::colors::Level;
use crate::data::PdfFile;
use crate::error::{Error, Result};

use super::{truncate, Session};

const PREVIEW_WIDTH: usize = 60;

pub async fn send(session: &Session, text: &str) -> Result<()> {
    let saved = session.ctx().data_manager().save_message(text).await?;
    session.emit(&saved)?;
    if saved.online {
        session.notice(Level::Success, &format!("message {} saved", saved.record.id));
    } else {
        session.notice(
            Level::Warning,
            &format!(
                "offline: message {} saved locally and will sync later",
                saved.record.id
            ),
        );
    }
    Ok(())
}

pub async fn upload(session: &Session, path: &Path) -> Result<()> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| Error::InvalidInput(format!("{} is not a file", path.display())))?;
    let bytes = tokio::fs::read(path).await?;
    let file = PdfFile::new(name, bytes);
    file.validate()
        .map_err(|e| Error::InvalidPdf(e.to_string()))?;

    let saved = session.ctx().data_manager().save_pdf(file).await?;
    session.emit(&saved)?;
    if saved.online {
        session.notice(
            Level::Success,
            &format!("{} uploaded ({} bytes)", saved.record.name, saved.record.size),
        );
    } else {
        session.notice(
            Level::Warning,
            &format!(
                "offline: {} saved locally and will upload later",
                saved.record.name
            ),
        );
    }
    Ok(())
}

pub async fn messages(session: &Session) -> Result<()> {
    let listing = session.ctx().data_manager().messages().await;
    if !session.emit(&listing)? {
        for m in &listing.records {
            println!(
                "{}  {}  {}{}",
                m.id,
                m.date.format("%Y-%m-%d %H:%M"),
                truncate(&m.msg, PREVIEW_WIDTH),
                if m.uploaded { "" } else { "  (pending)" }
            );
        }
    }
    session.notice(
        Level::Info,
        &format!(
            "{} message(s) from {}",
            listing.records.len(),
            listing.source
        ),
    );
    Ok(())
}

pub async fn pdfs(session: &Session) -> Result<()> {
    let listing = session.ctx().data_manager().pdfs().await;
    if !session.emit(&listing)? {
        for p in &listing.records {
            println!(
                "{}  {}  {} bytes{}",
                p.id,
                p.name,
                p.size,
                if p.uploaded { "" } else { "  (pending)" }
            );
        }
    }
    session.notice(
        Level::Info,
        &format!("{} PDF(s) from {}", listing.records.len(), listing.source),
    );
    Ok(())
}

pub fn delete_message(session: &Session, id: &str) -> Result<()> {
    if session.ctx().data_manager().delete_message(id)? {
        session.notice(Level::Success, &format!("message {} deleted", id));
    } else {
        session.notice(Level::Warning, &format!("no message with id {}", id));
    }
    Ok(())
}

pub fn delete_pdf(session: &Session, id: &str) -> Result<()> {
    if session.ctx().data_manager().delete_pdf(id)? {
        session.notice(Level::Success, &format!("PDF {} deleted", id));
    } else {
        session.notice(Level::Warning, &format!("no PDF with id {}", id));
    }
    Ok(())
}

pub async fn show_message(session: &Session, id: &str) -> Result<()> {
    let Some(found) = session.ctx().data_manager().message(id).await else {
        session.notice(Level::Warning, &format!("no message with id {}", id));
        return Ok(());
    };
    if !session.emit(&found)? {
        let m = &found.record;
        println!("ID: {}", m.id);
        println!("Date: {}", m.date.format("%Y-%m-%d %H:%M"));
        println!("Uploaded: {}", m.uploaded);
        println!();
        println!("{}", m.msg);
    }
    session.notice(Level::Info, &format!("message read from {}", found.source));
    Ok(())
}

pub async fn show_pdf(session: &Session, id: &str) -> Result<()> {
    let Some(found) = session.ctx().data_manager().pdf(id).await else {
        session.notice(Level::Warning, &format!("no PDF with id {}", id));
        return Ok(());
    };
    if !session.emit(&found)? {
        let p = &found.record;
        println!("ID: {}", p.id);
        println!("Name: {}", p.name);
        println!("Size: {} bytes", p.size);
        println!("Saved: {}", p.timestamp.format("%Y-%m-%d %H:%M"));
        println!("Uploaded: {}", p.uploaded);
    }
    session.notice(Level::Info, &format!("PDF read from {}", found.source));
    Ok(())
}

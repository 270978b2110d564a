use std::io::Write;
use std::net::SocketAddr;

use crate::app::{AppContext, EksiError, Result};
use crate::domain::SearchTerm;
use crate::server;

pub async fn serve(ctx: &AppContext, bind: Option<SocketAddr>) -> Result<()> {
    let addr = bind.unwrap_or(ctx.config.server.bind);
    server::serve(addr, ctx.pipeline.clone()).await
}

pub async fn print_feed(ctx: &AppContext, term: &str) -> Result<()> {
    let term = SearchTerm::new(term)?;
    let bytes = ctx.pipeline.feed(&term).await?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&bytes)?;
    stdout.flush()?;
    Ok(())
}

pub async fn inspect(ctx: &AppContext, term: &str) -> Result<()> {
    let term = SearchTerm::new(term)?;
    let cache = ctx.pipeline.cache();
    let path = cache.path_for(&term);

    let Some((bytes, fresh)) = cache.read_any(&term).await? else {
        println!("Nothing cached for {:?} ({})", term.as_str(), path.display());
        return Ok(());
    };

    let feed = feed_rs::parser::parse(bytes.as_slice())
        .map_err(|e| EksiError::Other(format!("cached feed is not valid RSS: {}", e)))?;

    println!("{}", path.display());
    println!(
        "  {} (ttl {}s)",
        if fresh { "fresh" } else { "stale" },
        cache.ttl().as_secs()
    );
    if let Some(title) = feed.title {
        println!("  title: {}", title.content);
    }
    if let Some(updated) = feed.updated {
        println!("  built: {}", updated.to_rfc2822());
    }
    println!("  {} items", feed.entries.len());

    for entry in feed.entries {
        let title = entry
            .title
            .map(|t| t.content)
            .unwrap_or_else(|| "(Untitled)".to_string());
        let link = entry.links.first().map(|l| l.href.as_str()).unwrap_or("");
        println!("  - {}  {}", title, link);
    }

    Ok(())
}

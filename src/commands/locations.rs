use anyhow::Result;

use hayah_api::IbgeClient;
use hayah_core::LocationApi;

use super::AppContext;

pub async fn cities(ctx: &AppContext, state: &str) -> Result<()> {
    let client = IbgeClient::new(
        &ctx.config.locations.base_url,
        ctx.config.api.request_timeout_seconds,
    )?;
    let municipalities = client.municipalities(state).await?;

    println!("{} municipalities in {}:\n", municipalities.len(), state.to_uppercase());
    for m in municipalities {
        println!("  {:>8}  {}", m.id, m.name);
    }
    Ok(())
}

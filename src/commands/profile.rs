use std::path::Path;

use anyhow::Result;

use hayah_core::{Profile, ProfileUpdate};

use super::AppContext;

fn print_profile(profile: &Profile) {
    println!("\n{} <{}>", profile.name, profile.email);
    let rows = [
        ("Phone", &profile.phone),
        ("Birth date", &profile.birth_date),
        ("State", &profile.state),
        ("City", &profile.city),
        ("Bio", &profile.bio),
    ];
    for (label, value) in rows {
        if !value.is_empty() {
            println!("  {:<12} {}", label, value);
        }
    }
    if let Some(url) = &profile.image_url {
        println!("  {:<12} {}", "Picture", url);
    }
    if !profile.interests.is_empty() {
        println!("  {:<12} {}", "Interests", profile.interests.join(", "));
    }
    if !profile.skills.is_empty() {
        println!("  {:<12} {}", "Skills", profile.skills.join(", "));
    }
}

pub async fn show(ctx: &AppContext, refresh: bool) -> Result<()> {
    let profile = ctx.profile_service().profile(refresh).await?;
    print_profile(&profile);
    Ok(())
}

pub async fn update(ctx: &AppContext, update: ProfileUpdate) -> Result<()> {
    let profile = ctx.profile_service().update(&update).await?;
    println!("✓ Profile updated");
    print_profile(&profile);
    Ok(())
}

pub async fn upload_image(ctx: &AppContext, path: &Path) -> Result<()> {
    let profile = ctx.profile_service().upload_image(path).await?;
    println!(
        "✓ Picture uploaded: {}",
        profile.image_url.as_deref().unwrap_or("(processing)")
    );
    Ok(())
}

pub async fn delete_image(ctx: &AppContext) -> Result<()> {
    let message = ctx.profile_service().delete_image().await?;
    println!("✓ {}", message);
    Ok(())
}

//! Site command handlers.

use std::fmt::Write as _;
use std::path::Path;

use cookiefy_core::{Console, Id, Site, SiteChanges, UploadFile};

use crate::cli::{GlobalOpts, SiteEditArgs, SitesArgs, SitesCommand};
use crate::error::CliError;
use crate::output::{self, or_dash};

use super::util;

// ── Detail view ─────────────────────────────────────────────────────

fn yes_no(flag: Option<bool>) -> &'static str {
    match flag {
        Some(true) => "yes",
        Some(false) => "no",
        None => "-",
    }
}

fn detail(site: &Site) -> String {
    let mut out = String::new();
    let mut line = |label: &str, value: String| {
        let _ = writeln!(out, "{} {value}", output::label(&format!("{label:<12}")));
    };

    line("ID", or_dash(site.id.as_ref()));
    line("Name", or_dash(site.name.as_ref()));
    line("Active", yes_no(site.active).into());
    line("Cuisine", or_dash(site.cuisine_type.as_ref()));
    line("Price", or_dash(site.price.as_ref()));
    line(
        "Score",
        match (site.score, site.num_opinions) {
            (Some(score), Some(n)) => format!("{score:.1} ({n} opinions)"),
            (Some(score), None) => format!("{score:.1}"),
            _ => "-".into(),
        },
    );

    let address: Vec<&str> = [
        &site.street,
        &site.city,
        &site.province,
        &site.region,
        &site.country,
    ]
    .into_iter()
    .filter_map(|part| part.as_deref().filter(|s| !s.is_empty()))
    .collect();
    line(
        "Address",
        if address.is_empty() {
            "-".into()
        } else {
            address.join(", ")
        },
    );

    line("Contact", or_dash(site.contact.as_ref()));
    line("Website", or_dash(site.website.as_ref()));
    line(
        "Dietary",
        format!(
            "vegan {}, gluten-free {}, halal {}",
            yes_no(site.is_vegan),
            yes_no(site.is_gluten_free),
            yes_no(site.is_halal)
        ),
    );
    line(
        "Hashtags",
        if site.hashtags.is_empty() {
            "-".into()
        } else {
            site.hashtags
                .iter()
                .map(|h| format!("#{}", h.name))
                .collect::<Vec<_>>()
                .join(" ")
        },
    );
    line(
        "Image",
        or_dash(site.image.as_ref().and_then(|i| i.path.as_ref())),
    );

    if let Some(schedule) = &site.opening_schedule {
        for (day, ranges) in &schedule.weekly {
            let hours = if ranges.is_empty() {
                "closed".into()
            } else {
                ranges
                    .iter()
                    .map(|r| format!("{}-{}", r.start, r.end))
                    .collect::<Vec<_>>()
                    .join(", ")
            };
            line(day.as_str(), hours);
        }
    }

    if let Some(description) = site.description.as_deref().filter(|d| !d.is_empty()) {
        let _ = write!(out, "\n{description}");
    }
    out.trim_end().to_owned()
}

fn print_site(site: &Site, global: &GlobalOpts) -> Result<(), CliError> {
    let out = output::render_single(&global.output, site, detail, |s| or_dash(s.id.as_ref()))?;
    output::print_output(&out, global.quiet);
    Ok(())
}

// ── Edit ────────────────────────────────────────────────────────────

fn changes_from(args: &SiteEditArgs) -> SiteChanges {
    SiteChanges {
        name: args.name.clone(),
        description: args.description.clone(),
        price: args.price.clone(),
        contact: args.contact.clone(),
        website: args.website.clone(),
        street: args.street.clone(),
        city: args.city.clone(),
        cuisine_type: args.cuisine_type.clone(),
        is_vegan: args.vegan,
        is_gluten_free: args.gluten_free,
        is_halal: args.halal,
        active: args.active,
    }
}

async fn upload(console: &Console, id: &Id, path: &Path, global: &GlobalOpts) -> Result<(), CliError> {
    let mime = util::image_mime(path)?;
    let bytes = std::fs::read(path)?;
    let file_name = path
        .file_name()
        .map_or_else(|| "image".into(), |n| n.to_string_lossy().into_owned());

    let spinner = util::spinner(&format!("Uploading {file_name}"), global.quiet);
    let result = console
        .upload_site_image(
            id,
            UploadFile {
                file_name,
                mime: mime.into(),
                bytes,
            },
        )
        .await;
    spinner.finish_and_clear();

    let message = result?;
    if !global.quiet {
        let text = message.unwrap_or_else(|| format!("Image uploaded for site {id}"));
        eprintln!("{}", output::success(&text));
    }
    Ok(())
}

async fn edit(console: &Console, args: SiteEditArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let changes = changes_from(&args);
    if changes.is_empty() && args.image.is_none() {
        return Err(CliError::Validation {
            field: "fields".into(),
            reason: "nothing to change; pass at least one field flag or --image".into(),
        });
    }

    let id = Id::from(args.id.as_str());
    if let Some(path) = &args.image {
        upload(console, &id, path, global).await?;
    }
    if changes.is_empty() {
        return Ok(());
    }

    let mut draft = console.edit_site(&id).await?;
    draft.apply(changes);
    if !draft.is_dirty() {
        if !global.quiet {
            eprintln!("Site {id} already has these values");
        }
        return Ok(());
    }

    let site = console.save_site(draft).await?;
    if !global.quiet {
        eprintln!("{}", output::success(&format!("Site {id} saved")));
    }
    print_site(&site, global)
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(console: &Console, args: SitesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        SitesCommand::Get { id } => {
            let site = console.site(&Id::from(id.as_str())).await?;
            print_site(&site, global)
        }
        SitesCommand::Edit(edit_args) => edit(console, edit_args, global).await,
        SitesCommand::UploadImage { id, file } => {
            upload(console, &Id::from(id.as_str()), &file, global).await
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn detail_lists_address_and_hours() {
        let site: Site = serde_json::from_value(serde_json::json!({
            "id": 7,
            "name": "Trattoria Roma",
            "street": "Via Appia 1",
            "city": "Roma",
            "country": "IT",
            "is_vegan": true,
            "hashtags": [{"id": 1, "name": "pasta"}],
            "opening_schedule": {
                "timezone": "Europe/Rome",
                "weekly": {"monday": [{"start": "12:00", "end": "15:00"}], "tuesday": []}
            }
        }))
        .unwrap();

        let out = detail(&site);
        assert!(out.contains("Via Appia 1, Roma, IT"));
        assert!(out.contains("vegan yes"));
        assert!(out.contains("#pasta"));
        assert!(out.contains("12:00-15:00"));
        assert!(out.contains("closed"));
    }

    #[test]
    fn flags_map_to_changes() {
        let args = SiteEditArgs {
            id: "7".into(),
            name: Some("Roma".into()),
            description: None,
            price: None,
            contact: None,
            website: None,
            street: None,
            city: None,
            cuisine_type: None,
            vegan: Some(false),
            gluten_free: None,
            halal: None,
            active: None,
            image: None,
        };
        let changes = changes_from(&args);
        assert_eq!(changes.name.as_deref(), Some("Roma"));
        assert_eq!(changes.is_vegan, Some(false));
        assert!(!changes.is_empty());
    }
}

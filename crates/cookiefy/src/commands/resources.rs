//! Users, lists, hashtags and restaurants.
//!
//! The four collections share one REST shape, so one handler serves them
//! all; each gets its own table row through `ResourceView`.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tabled::Tabled;

use cookiefy_core::{Console, Hashtag, Id, ListSummary, Resource, Restaurant, UserSummary};

use crate::cli::{GlobalOpts, ListArgs, ResourceArgs, ResourceCommand};
use crate::error::CliError;
use crate::output::{self, or_dash};

use super::util;

// ── Views ───────────────────────────────────────────────────────────

/// How a record type is listed.
trait ResourceView: DeserializeOwned + Serialize {
    type Row: Tabled;

    fn row(&self) -> Self::Row;
    fn id(&self) -> Option<&Id>;
}

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Username")]
    username: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Admin")]
    admin: String,
}

impl ResourceView for UserSummary {
    type Row = UserRow;

    fn row(&self) -> UserRow {
        UserRow {
            id: or_dash(self.id.as_ref()),
            username: or_dash(self.username.as_ref()),
            name: or_dash(self.name.as_ref()),
            email: or_dash(self.email.as_ref()),
            admin: if self.is_admin.unwrap_or(false) {
                "yes".into()
            } else {
                String::new()
            },
        }
    }

    fn id(&self) -> Option<&Id> {
        self.id.as_ref()
    }
}

#[derive(Tabled)]
struct ListRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Sites")]
    sites: String,
    #[tabled(rename = "Creator")]
    creator: String,
}

impl ResourceView for ListSummary {
    type Row = ListRow;

    fn row(&self) -> ListRow {
        ListRow {
            id: or_dash(self.id.as_ref()),
            name: or_dash(self.name.as_ref()),
            sites: or_dash(self.sites_count),
            creator: or_dash(self.creator.as_ref()),
        }
    }

    fn id(&self) -> Option<&Id> {
        self.id.as_ref()
    }
}

#[derive(Tabled)]
struct HashtagRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
}

impl ResourceView for Hashtag {
    type Row = HashtagRow;

    fn row(&self) -> HashtagRow {
        HashtagRow {
            id: or_dash(self.id.as_ref()),
            name: format!("#{}", self.name),
        }
    }

    fn id(&self) -> Option<&Id> {
        self.id.as_ref()
    }
}

#[derive(Tabled)]
struct RestaurantRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "City")]
    city: String,
    #[tabled(rename = "Cuisine")]
    cuisine: String,
    #[tabled(rename = "Score")]
    score: String,
}

impl ResourceView for Restaurant {
    type Row = RestaurantRow;

    fn row(&self) -> RestaurantRow {
        RestaurantRow {
            id: or_dash(self.id.as_ref()),
            name: or_dash(self.name.as_ref()),
            city: or_dash(self.city.as_ref()),
            cuisine: or_dash(self.cuisine_type.as_ref()),
            score: or_dash(self.score.map(|s| format!("{s:.1}"))),
        }
    }

    fn id(&self) -> Option<&Id> {
        self.id.as_ref()
    }
}

// ── Helpers ─────────────────────────────────────────────────────────

fn list_params(args: &ListArgs) -> Result<Vec<(String, String)>, CliError> {
    let mut params = Vec::new();
    if let Some(limit) = args.limit {
        params.push(("limit".to_owned(), limit.to_string()));
    }
    if let Some(skip) = args.skip {
        params.push(("skip".to_owned(), skip.to_string()));
    }
    for raw in &args.params {
        params.push(util::parse_param(raw)?);
    }
    Ok(params)
}

/// Records are free-form JSON; show them as pretty JSON in table mode.
fn render_value(value: &serde_json::Value, global: &GlobalOpts) -> Result<String, CliError> {
    output::render_single(
        &global.output,
        value,
        |v| serde_json::to_string_pretty(v).unwrap_or_else(|_| v.to_string()),
        |v| {
            v.get("id")
                .map(|id| id.as_str().map_or_else(|| id.to_string(), str::to_owned))
                .unwrap_or_default()
        },
    )
}

async fn list<T: ResourceView>(
    console: &Console,
    resource: Resource,
    args: &ListArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let owned = list_params(args)?;
    let params: Vec<(&str, String)> = owned.iter().map(|(k, v)| (k.as_str(), v.clone())).collect();

    let items: Vec<T> = console.list(resource, &params).await?;
    let out = output::render_list(&global.output, &items, T::row, |item| {
        or_dash(item.id())
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    console: &Console,
    resource: Resource,
    args: ResourceArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ResourceCommand::List(list_args) => match resource {
            Resource::Users => list::<UserSummary>(console, resource, &list_args, global).await,
            Resource::Lists => list::<ListSummary>(console, resource, &list_args, global).await,
            Resource::Hashtags => list::<Hashtag>(console, resource, &list_args, global).await,
            Resource::Restaurants => {
                list::<Restaurant>(console, resource, &list_args, global).await
            }
        },

        ResourceCommand::Get { id } => {
            let value: serde_json::Value = console.get(resource, &Id::from(id.as_str())).await?;
            let out = render_value(&value, global)?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ResourceCommand::Create(body) => {
            let body = util::read_body(&body)?;
            let created = console.create(resource, &body).await?;
            if !global.quiet {
                eprintln!("{}", output::success(&format!("Created in {resource}")));
            }
            let out = render_value(&created, global)?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ResourceCommand::Update { id, body } => {
            let body = util::read_body(&body)?;
            let id = Id::from(id.as_str());
            let updated = console.update(resource, &id, &body).await?;
            if !global.quiet {
                eprintln!("{}", output::success(&format!("Updated {resource}/{id}")));
            }
            let out = render_value(&updated, global)?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ResourceCommand::Delete { id } => {
            let id = Id::from(id.as_str());
            if !util::confirm(
                &format!("Delete {resource}/{id}? This cannot be undone."),
                &format!("{resource} delete"),
                global.yes,
            )? {
                return Ok(());
            }
            console.delete(resource, &id).await?;
            if !global.quiet {
                eprintln!("{}", output::success(&format!("Deleted {resource}/{id}")));
            }
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn list_params_combine_paging_and_extras() {
        let args = ListArgs {
            limit: Some(20),
            skip: Some(40),
            params: vec!["is_admin=true".into()],
        };
        assert_eq!(
            list_params(&args).unwrap(),
            vec![
                ("limit".to_owned(), "20".to_owned()),
                ("skip".to_owned(), "40".to_owned()),
                ("is_admin".to_owned(), "true".to_owned()),
            ]
        );
    }

    #[test]
    fn hashtag_row_prefixes_name() {
        let tag = Hashtag {
            id: Some(Id::Int(3)),
            name: "brunch".into(),
        };
        let row = tag.row();
        assert_eq!(row.id, "3");
        assert_eq!(row.name, "#brunch");
    }
}

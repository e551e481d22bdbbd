//! Search command handler.

use tabled::Tabled;

use cookiefy_core::{Console, ListSummary, SearchQuery, SearchResults, SiteSummary, UserSummary};

use crate::cli::{GlobalOpts, SearchArgs};
use crate::error::CliError;
use crate::output::{self, or_dash};

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct SiteRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "City")]
    city: String,
    #[tabled(rename = "Score")]
    score: String,
    #[tabled(rename = "Opinions")]
    opinions: String,
    #[tabled(rename = "Price")]
    price: String,
}

impl From<&SiteSummary> for SiteRow {
    fn from(s: &SiteSummary) -> Self {
        Self {
            id: or_dash(s.id.as_ref()),
            name: or_dash(s.name.as_ref()),
            city: or_dash(s.city.as_ref()),
            score: or_dash(s.score.map(|v| format!("{v:.1}"))),
            opinions: or_dash(s.num_opinions),
            price: or_dash(s.price.as_ref()),
        }
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

impl From<&ListSummary> for ListRow {
    fn from(l: &ListSummary) -> Self {
        Self {
            id: or_dash(l.id.as_ref()),
            name: or_dash(l.name.as_ref()),
            sites: or_dash(l.sites_count),
            creator: or_dash(l.creator.as_ref()),
        }
    }
}

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Username")]
    username: String,
    #[tabled(rename = "Name")]
    name: String,
}

impl From<&UserSummary> for UserRow {
    fn from(u: &UserSummary) -> Self {
        Self {
            id: or_dash(u.id.as_ref()),
            username: or_dash(u.username.as_ref()),
            name: or_dash(u.name.as_ref()),
        }
    }
}

// ── Query ───────────────────────────────────────────────────────────

/// No kind flag selects every kind.
fn build_query(args: SearchArgs) -> SearchQuery {
    let all = !(args.sites || args.lists || args.users);
    SearchQuery {
        input: args.input,
        is_site: all || args.sites,
        is_list: all || args.lists,
        is_user: all || args.users,
        is_admin: args.admin,
        lat: args.lat,
        lon: args.lon,
        city: args.city,
        cuisine: args.cuisine,
        token: None,
    }
}

fn render_sections(results: &SearchResults) -> String {
    let mut sections = Vec::new();
    if !results.sites.is_empty() {
        let rows: Vec<SiteRow> = results.sites.iter().map(SiteRow::from).collect();
        sections.push(format!(
            "{}\n{}",
            output::label("Sites"),
            output::render_table(&rows)
        ));
    }
    if !results.lists.is_empty() {
        let rows: Vec<ListRow> = results.lists.iter().map(ListRow::from).collect();
        sections.push(format!(
            "{}\n{}",
            output::label("Lists"),
            output::render_table(&rows)
        ));
    }
    if !results.users.is_empty() {
        let rows: Vec<UserRow> = results.users.iter().map(UserRow::from).collect();
        sections.push(format!(
            "{}\n{}",
            output::label("Users"),
            output::render_table(&rows)
        ));
    }
    if sections.is_empty() {
        return "No results".into();
    }
    sections.join("\n\n")
}

fn plain_ids(results: &SearchResults) -> String {
    let sites = results
        .sites
        .iter()
        .filter_map(|s| s.id.as_ref().map(|id| format!("site\t{id}")));
    let lists = results
        .lists
        .iter()
        .filter_map(|l| l.id.as_ref().map(|id| format!("list\t{id}")));
    let users = results
        .users
        .iter()
        .filter_map(|u| u.id.as_ref().map(|id| format!("user\t{id}")));
    sites.chain(lists).chain(users).collect::<Vec<_>>().join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(console: &Console, args: SearchArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let query = build_query(args);
    let results = console.search(&query).await?;

    let out = output::render_single(&global.output, &results, render_sections, plain_ids)?;
    output::print_output(&out, global.quiet);
    Ok(())
}

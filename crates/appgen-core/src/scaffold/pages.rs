//! List and detail page generators.
//!
//! Server pages try the ORM first (only when `DATABASE_URL` is set) and fall
//! back to fixture rows. Static pages read fixtures only; static detail pages
//! enumerate their params at build time.

use std::collections::BTreeMap;

use crate::route::{capitalize, PageKind, PageRoute};
use crate::templates::render;

const FIXTURE_IMPORT: &str = r#"import fixtures from "__SRC__/lib/fixtures.json";"#;
const DB_IMPORT: &str = r#"import { db } from "__SRC__/lib/db";"#;
const FIXTURE_ROWS: &str = r#"const rows = ((fixtures as any)["__COLLECTION__"] || []) as any[];"#;
const EMPTY_ROWS: &str = "const rows: any[] = [];";

const SERVER_LIST: &str = r#"
async function getItems() {
  const model = (db as any)?.["__SINGULAR__"];
  if (process.env.DATABASE_URL && model?.findMany) {
    try {
      return (await model.findMany({ take: 50 })) as any[];
    } catch {}
  }
  return rows;
}

export default async function Page() {
  const items = await getItems();
"#;

const STATIC_LIST: &str = r#"
export default function Page() {
  const items = rows;
"#;

const LIST_BODY: &str = r#"  return (
    <main style={{ padding: 24 }}>
      <h1>{"__TITLE__"}</h1>
      <ul style={{ display: "grid", gap: 12, listStyle: "none", padding: 0 }}>
        {items.map((it: any) => (
          <li key={String(it.id)} style={{ border: "1px solid #333", borderRadius: 12, padding: 12 }}>
            <a href={"__BASE__/" + String(it.id)} style={{ textDecoration: "none" }}>
              <div style={{ fontWeight: 600 }}>{it.title ?? it.name ?? "__LABEL__ #" + String(it.id)}</div>
              <div style={{ opacity: 0.8 }}>{it.author ?? it.description ?? ""}</div>
            </a>
          </li>
        ))}
      </ul>
    </main>
  );
}
"#;

const PARAM_KEY: &str = r#"
type Params = Record<string, string | string[]>;

function paramKey(params: Params): string {
  const raw = params["__PARAM__"];
  return Array.isArray(raw) ? raw.join("/") : String(raw);
}
"#;

const SERVER_DETAIL: &str = r#"
async function getItem(id: string) {
  const model = (db as any)?.["__SINGULAR__"];
  if (process.env.DATABASE_URL && model?.findUnique) {
    try {
      return await model.findUnique({ where: { id } });
    } catch {}
  }
  return rows.find((x) => String(x.id) === id);
}

export default async function Page({ params }: { params: Params }) {
  const item = await getItem(paramKey(params));
"#;

/// `__PARAM_VALUE__` is replaced before token rendering; it is code, not text.
const STATIC_DETAIL: &str = r#"
export function generateStaticParams() {
  return rows.map((x) => ({ ["__PARAM__"]: __PARAM_VALUE__ }));
}

export default function Page({ params }: { params: Params }) {
  const item = rows.find((x) => String(x.id) === paramKey(params));
"#;

const DETAIL_BODY: &str = r##"  if (!item) {
    return (
      <main style={{ padding: 24 }}>
        <h1>{"__TITLE__"}</h1>
        <p>Not found.</p>
      </main>
    );
  }
  return (
    <main style={{ padding: 24 }}>
      <h1>{"__TITLE__"}</h1>
      <div style={{ border: "1px solid #333", borderRadius: 12, padding: 16 }}>
        <div style={{ fontWeight: 700, fontSize: 18 }}>{item.title ?? item.name ?? "__LABEL__ #" + String(item.id)}</div>
        <div style={{ opacity: 0.8 }}>{item.author ?? item.description ?? ""}</div>
        <pre style={{ marginTop: 12, background: "#111", padding: 12, borderRadius: 8 }}>
          {JSON.stringify(item, null, 2)}
        </pre>
      </div>
    </main>
  );
}
"##;

/// Render the page module for `route`.
///
/// `tokens` is the plan entry's token map; route-specific tokens are added
/// here. Without fixtures, server pages fall back to an empty list.
pub fn render_page(
    route: &PageRoute,
    tokens: &BTreeMap<String, String>,
    is_ssr: bool,
    with_fixtures: bool,
) -> String {
    let mut source = String::new();
    if with_fixtures {
        source.push_str(FIXTURE_IMPORT);
        source.push('\n');
    }
    if is_ssr {
        source.push_str(DB_IMPORT);
        source.push('\n');
    }
    source.push('\n');
    source.push_str(if with_fixtures { FIXTURE_ROWS } else { EMPTY_ROWS });
    source.push('\n');

    let label = capitalize(&route.singular);
    let (head, body, title) = match (route.kind, is_ssr) {
        (PageKind::List, true) => (SERVER_LIST, LIST_BODY, format!("{label} List")),
        (PageKind::List, false) => (STATIC_LIST, LIST_BODY, format!("{label} List")),
        (PageKind::Detail, true) => (SERVER_DETAIL, DETAIL_BODY, format!("{label} Detail")),
        (PageKind::Detail, false) => (STATIC_DETAIL, DETAIL_BODY, format!("{label} Detail")),
    };
    if route.kind == PageKind::Detail {
        source.push_str(PARAM_KEY);
    }
    let catch_all = route.param.as_ref().is_some_and(|p| p.catch_all);
    let param_value = if catch_all {
        "[String(x.id)]"
    } else {
        "String(x.id)"
    };
    source.push_str(&head.replace("__PARAM_VALUE__", param_value));
    source.push_str(body);

    let mut tokens = tokens.clone();
    tokens.insert("__SRC__".to_string(), route.rel_to_src());
    tokens.insert("__COLLECTION__".to_string(), route.collection.clone());
    tokens.insert("__SINGULAR__".to_string(), route.singular.clone());
    tokens.insert("__TITLE__".to_string(), title);
    tokens.insert("__LABEL__".to_string(), label);
    tokens.insert("__BASE__".to_string(), route.path.trim_end_matches('/').to_string());
    if let Some(param) = &route.param {
        tokens.insert("__PARAM__".to_string(), param.name.clone());
    }
    render(&source, &tokens)
}

use crate::spec::DeployTarget;

const GH_PAGES_WORKFLOW: &str = r#"name: Deploy to GitHub Pages

on:
  push:
    branches: [main]
  workflow_dispatch:

permissions:
  contents: read
  pages: write
  id-token: write

jobs:
  deploy:
    runs-on: ubuntu-latest
    environment:
      name: github-pages
      url: ${{ steps.deployment.outputs.page_url }}
    steps:
      - uses: actions/checkout@v4
      - uses: actions/setup-node@v4
        with:
          node-version: 20
          cache: npm
      - run: npm i --no-fund --no-audit
      - run: npm run build
        env:
          GITHUB_PAGES: "true"
      - uses: actions/upload-pages-artifact@v3
        with:
          path: out
      - id: deployment
        uses: actions/deploy-pages@v4
"#;

/// The single deploy artifact for `target`: (relative path, contents).
pub fn deploy_artifact(target: DeployTarget) -> (&'static str, String) {
    match target {
        DeployTarget::Vercel => {
            let config = serde_json::json!({ "version": 2 });
            ("vercel.json", format!("{config:#}\n"))
        }
        DeployTarget::GithubPages => (
            ".github/workflows/gh-pages.yml",
            GH_PAGES_WORKFLOW.to_string(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vercel_gets_versioned_config() {
        let (path, body) = deploy_artifact(DeployTarget::Vercel);
        assert_eq!(path, "vercel.json");
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["version"], 2);
    }

    #[test]
    fn github_pages_gets_workflow() {
        let (path, body) = deploy_artifact(DeployTarget::GithubPages);
        assert_eq!(path, ".github/workflows/gh-pages.yml");
        assert!(body.contains("actions/deploy-pages"));
        assert!(body.contains("GITHUB_PAGES: \"true\""));
    }
}

use url::Url;
use crate::shared::result::Result;

/// GitHub commits_url 模板中的 sha 占位段
const SHA_PLACEHOLDER: &str = "{/sha}";

/// GitHub REST API 地址构造
#[derive(Debug, Clone)]
pub struct GitHubEndpoints {
    base: Url,
    per_page: u32,
}

impl GitHubEndpoints {
    pub fn new(api_base_url: &str, per_page: u32) -> Result<Self> {
        let mut base = Url::parse(api_base_url)?;
        // 保证 join 时不会丢掉 base 的最后一段路径
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self { base, per_page })
    }

    /// 账号拥有的仓库列表
    pub fn owned_repositories(&self, username: &str) -> Result<Url> {
        let mut url = self.base.join(&format!("users/{}/repos", username))?;
        url.query_pairs_mut()
            .append_pair("type", "owner")
            .append_pair("per_page", &self.per_page.to_string());
        Ok(url)
    }

    /// 由 commits_url 模板得到提交列表地址
    pub fn commit_list(&self, commits_url_template: &str) -> Result<Url> {
        let mut url = Url::parse(&commits_url_template.replace(SHA_PLACEHOLDER, ""))?;
        url.query_pairs_mut()
            .append_pair("per_page", &self.per_page.to_string());
        Ok(url)
    }

    /// 为已存储的仓库重建 commits_url 模板
    pub fn commits_url_template(&self, owner: &str, name: &str) -> Result<String> {
        let url = self.base.join(&format!("repos/{}/{}/commits", owner, name))?;
        Ok(format!("{}{}", url, SHA_PLACEHOLDER))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owned_repositories_url() {
        let endpoints = GitHubEndpoints::new("https://api.github.com", 100).unwrap();
        assert_eq!(
            endpoints.owned_repositories("octocat").unwrap().as_str(),
            "https://api.github.com/users/octocat/repos?type=owner&per_page=100"
        );
    }

    #[test]
    fn base_path_is_preserved() {
        let endpoints = GitHubEndpoints::new("https://ghe.example.com/api/v3", 50).unwrap();
        assert_eq!(
            endpoints.owned_repositories("me").unwrap().as_str(),
            "https://ghe.example.com/api/v3/users/me/repos?type=owner&per_page=50"
        );
    }

    #[test]
    fn commit_list_strips_sha_placeholder() {
        let endpoints = GitHubEndpoints::new("https://api.github.com", 100).unwrap();
        let url = endpoints
            .commit_list("https://api.github.com/repos/octocat/hello/commits{/sha}")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.github.com/repos/octocat/hello/commits?per_page=100"
        );
    }

    #[test]
    fn template_round_trips_through_commit_list() {
        let endpoints = GitHubEndpoints::new("https://api.github.com/", 100).unwrap();
        let template = endpoints.commits_url_template("octocat", "hello").unwrap();
        assert_eq!(template, "https://api.github.com/repos/octocat/hello/commits{/sha}");
        assert_eq!(
            endpoints.commit_list(&template).unwrap().path(),
            "/repos/octocat/hello/commits"
        );
    }
}

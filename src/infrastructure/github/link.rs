/// 从 `Link` 响应头中取出 `rel="next"` 的 URL
///
/// GitHub 格式: `<https://api.github.com/x?page=2>; rel="next", <...>; rel="last"`
pub fn next_link(header: &str) -> Option<String> {
    header.split(',').find_map(|entry| {
        let mut parts = entry.split(';');
        let target = parts.next()?.trim();
        let is_next = parts.any(|param| {
            let param = param.trim();
            match param.strip_prefix("rel=") {
                Some(rel) => rel
                    .trim_matches('"')
                    .split_whitespace()
                    .any(|r| r.eq_ignore_ascii_case("next")),
                None => false,
            }
        });

        if !is_next {
            return None;
        }

        target
            .strip_prefix('<')
            .and_then(|t| t.strip_suffix('>'))
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
    })
}

// 代理地址处理：协议前缀识别与 主机:端口 拆分

// 可识别的代理协议
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Http,
    Https,
    Socks5,
    Socks4,
}

impl Scheme {
    pub const ALL: [Scheme; 4] = [Scheme::Http, Scheme::Https, Scheme::Socks5, Scheme::Socks4];

    pub fn prefix(self) -> &'static str {
        match self {
            Scheme::Http => "http://",
            Scheme::Https => "https://",
            Scheme::Socks5 => "socks5://",
            Scheme::Socks4 => "socks4://",
        }
    }
}

// 检测地址是否已带协议前缀
pub fn detect_scheme(address: &str) -> Option<Scheme> {
    Scheme::ALL
        .into_iter()
        .find(|scheme| address.starts_with(scheme.prefix()))
}

// 为不带前缀的地址补全协议；未确定协议时使用 http://
pub fn qualify(address: &str, scheme: Option<Scheme>) -> String {
    if detect_scheme(address).is_some() {
        return address.to_string();
    }
    let scheme = match scheme {
        Some(Scheme::Socks5) => Scheme::Socks5,
        _ => Scheme::Http,
    };
    format!("{}{}", scheme.prefix(), address)
}

// 拆分 主机:端口，要求恰好一个冒号且两侧非空
pub fn split_host_port(address: &str) -> Option<(&str, &str)> {
    let (host, port) = address.split_once(':')?;
    if host.is_empty() || port.is_empty() || port.contains(':') {
        return None;
    }
    Some((host, port))
}

// 去掉 http:// 或 https:// 前缀
pub fn strip_http_scheme(value: &str) -> &str {
    value
        .strip_prefix(Scheme::Http.prefix())
        .or_else(|| value.strip_prefix(Scheme::Https.prefix()))
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_scheme() {
        assert_eq!(detect_scheme("http://127.0.0.1:10808"), Some(Scheme::Http));
        assert_eq!(detect_scheme("https://proxy:443"), Some(Scheme::Https));
        assert_eq!(detect_scheme("socks5://127.0.0.1:1080"), Some(Scheme::Socks5));
        assert_eq!(detect_scheme("socks4://127.0.0.1:1080"), Some(Scheme::Socks4));
        assert_eq!(detect_scheme("127.0.0.1:10808"), None);
        assert_eq!(detect_scheme("HTTP://127.0.0.1:10808"), None);
    }

    #[test]
    fn test_qualify_keeps_prefixed_address_verbatim() {
        assert_eq!(
            qualify("socks4://10.0.0.1:1080", Some(Scheme::Http)),
            "socks4://10.0.0.1:1080"
        );
        assert_eq!(qualify("192.168.1.1:8080", Some(Scheme::Http)), "http://192.168.1.1:8080");
        assert_eq!(qualify("192.168.1.1:8080", Some(Scheme::Socks5)), "socks5://192.168.1.1:8080");
        assert_eq!(qualify("192.168.1.1:8080", None), "http://192.168.1.1:8080");
    }

    #[test]
    fn test_split_host_port() {
        assert_eq!(split_host_port("127.0.0.1:10808"), Some(("127.0.0.1", "10808")));
        assert_eq!(split_host_port("127.0.0.1"), None);
        assert_eq!(split_host_port("http://127.0.0.1:10808"), None);
        assert_eq!(split_host_port(":8080"), None);
        assert_eq!(split_host_port("host:"), None);
    }

    #[test]
    fn test_strip_http_scheme() {
        assert_eq!(strip_http_scheme("http://10.0.0.5:1080"), "10.0.0.5:1080");
        assert_eq!(strip_http_scheme("https://10.0.0.5:1080"), "10.0.0.5:1080");
        assert_eq!(strip_http_scheme("socks5://10.0.0.5:1080"), "socks5://10.0.0.5:1080");
        assert_eq!(strip_http_scheme("10.0.0.5:1080"), "10.0.0.5:1080");
    }
}

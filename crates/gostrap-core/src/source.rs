use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use ureq::Agent;

/// Where template resources come from. Fixed at construction: developers
/// iterating on templates read them from the project directory, everyone
/// else fetches them from the versioned remote repository.
pub enum ContentSource {
    Dev { project_dir: PathBuf },
    Remote { agent: Agent, base_url: String },
}

impl ContentSource {
    pub fn dev(project_dir: PathBuf) -> Self {
        ContentSource::Dev { project_dir }
    }

    pub fn remote(base_url: String) -> Self {
        // non-2xx responses must stay readable so their bodies can be
        // surfaced to the operator
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        ContentSource::Remote { agent, base_url }
    }

    /// Fetch the raw bytes of a named resource. Every failure is fatal for
    /// the run; a non-200 remote response prints its body first.
    pub fn fetch(&self, name: &str) -> Result<Vec<u8>> {
        match self {
            ContentSource::Dev { project_dir } => {
                let path = project_dir.join(name);
                fs::read(&path).with_context(|| format!("cannot load dev resource {name}"))
            }
            ContentSource::Remote { agent, base_url } => {
                let url = format!("{base_url}{name}");
                let mut response = agent
                    .get(&url)
                    .call()
                    .with_context(|| format!("cannot download {url}"))?;
                let status = response.status();
                if status != 200 {
                    let body = response.body_mut().read_to_string().unwrap_or_default();
                    eprintln!("download content from {url}");
                    eprintln!("{body}");
                    bail!("cannot download {url}: HTTP {status}");
                }
                response
                    .body_mut()
                    .read_to_vec()
                    .with_context(|| format!("cannot read body of {url}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_dev_source_returns_file_contents_verbatim() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("Makefile.tmpl"), b"build:\n\tgo build\n").unwrap();

        let source = ContentSource::dev(tmp.path().to_path_buf());
        let data = source.fetch("Makefile.tmpl").unwrap();
        assert_eq!(data, b"build:\n\tgo build\n");
    }

    #[test]
    fn test_dev_source_missing_file_fails() {
        let tmp = TempDir::new().unwrap();
        let source = ContentSource::dev(tmp.path().to_path_buf());
        let err = source.fetch("build.go.tmpl").unwrap_err();
        assert!(
            err.to_string()
                .contains("cannot load dev resource build.go.tmpl")
        );
    }

    #[test]
    fn test_remote_source_fetches_resource() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("GET", "/Makefile.tmpl")
            .with_status(200)
            .with_body("BINARY={{ BinaryName }}\n")
            .create();

        let source = ContentSource::remote(format!("{}/", server.url()));
        let data = source.fetch("Makefile.tmpl").unwrap();
        assert_eq!(data, b"BINARY={{ BinaryName }}\n");
        mock.assert();
    }

    #[test]
    fn test_remote_source_non_200_is_fatal() {
        let mut server = mockito::Server::new();
        server
            .mock("GET", "/build.go.tmpl")
            .with_status(404)
            .with_body("template moved")
            .create();

        let source = ContentSource::remote(format!("{}/", server.url()));
        let err = source.fetch("build.go.tmpl").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("cannot download"), "{message}");
        assert!(message.contains("404"), "{message}");
    }

    #[test]
    fn test_remote_source_transport_error_is_fatal() {
        // grab a port, then release it so the connection is refused
        let url = {
            let server = mockito::Server::new();
            server.url()
        };
        let source = ContentSource::remote(format!("{url}/"));
        let err = source.fetch("Makefile.tmpl").unwrap_err();
        assert!(err.to_string().contains("cannot download"));
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/*! Debian repository HTTP client.

This module provides functionality for interfacing with HTTP based Debian
repositories.
*/

use {
    crate::{
        error::{ContentsError, Result},
        io::DataResolver,
    },
    async_trait::async_trait,
    futures::{stream::TryStreamExt, AsyncRead},
    log::debug,
    reqwest::{Client, IntoUrl, Url},
    std::pin::Pin,
};

async fn fetch_url(
    client: &Client,
    root_url: &Url,
    path: &str,
) -> Result<Pin<Box<dyn AsyncRead + Send>>> {
    let url = root_url.join(path)?;
    debug!("GET {}", url);

    let res = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| ContentsError::Transport(url.to_string(), e))?;
    let res = res
        .error_for_status()
        .map_err(|e| ContentsError::Transport(url.to_string(), e))?;

    // Failures while streaming the body are still transport failures. Carry them
    // through the reader so ContentsError::from_stream_error() can recover them.
    let body_url = url.to_string();

    Ok(Box::pin(
        res.bytes_stream()
            .map_err(move |e| {
                std::io::Error::new(
                    std::io::ErrorKind::Other,
                    ContentsError::Transport(body_url.clone(), e),
                )
            })
            .into_async_read(),
    ))
}

/// Client for a Debian repository served via HTTP.
///
/// Instances are bound to a base URL. For `Contents` retrieval this is
/// typically a component directory, e.g.
/// `http://ftp.uk.debian.org/debian/dists/stable/main/`.
#[derive(Debug)]
pub struct HttpRepositoryClient {
    /// HTTP client to use.
    client: Client,

    /// Base URL that relative paths are resolved against.
    root_url: Url,
}

impl HttpRepositoryClient {
    /// Construct an instance bound to the specified URL.
    pub fn new(url: impl IntoUrl) -> Result<Self> {
        Self::new_client(Client::default(), url)
    }

    /// Construct an instance using the given [Client] and URL.
    pub fn new_client(client: Client, url: impl IntoUrl) -> Result<Self> {
        let mut root_url = url.into_url().map_err(ContentsError::HttpUrl)?;

        // Trailing URLs are significant to the Url type when we .join(). So ensure
        // the URL has a trailing path.
        if !root_url.path().ends_with('/') {
            root_url.set_path(&format!("{}/", root_url.path()));
        }

        Ok(Self { client, root_url })
    }

    /// Obtain the URL to which this client is bound.
    pub fn url(&self) -> &Url {
        &self.root_url
    }
}

#[async_trait]
impl DataResolver for HttpRepositoryClient {
    async fn get_path(&self, path: &str) -> Result<Pin<Box<dyn AsyncRead + Send>>> {
        fetch_url(&self.client, &self.root_url, path).await
    }
}

#[cfg(test)]
mod test {
    use {
        super::*,
        crate::{
            repository::{
                contents::ContentsFile, download_contents_file, fetch_contents_file,
                ContentsIndexFetch, DEFAULT_MIRROR_URL,
            },
            testutil::gzip,
        },
        std::{
            io::{Read, Write},
            net::TcpListener,
            sync::mpsc::{channel, Receiver},
        },
    };

    const BULLSEYE_CONTRIB_URL: &str =
        "http://snapshot.debian.org/archive/debian/20211120T085721Z/dists/bullseye/contrib";

    /// Serve a single canned HTTP response on a local port.
    ///
    /// Returns a mirror URL pointing at the server and a channel receiving the
    /// request line of the served request.
    fn serve_once(response: Vec<u8>) -> Result<(Url, Receiver<String>)> {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let addr = listener.local_addr()?;
        let (tx, rx) = channel();

        std::thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut request = vec![];
                let mut buf = [0u8; 1024];

                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match stream.read(&mut buf) {
                        Ok(0) | Err(_) => break,
                        Ok(count) => request.extend_from_slice(&buf[0..count]),
                    }
                }

                let request = String::from_utf8_lossy(&request);
                let _ = tx.send(request.lines().next().unwrap_or_default().to_string());
                let _ = stream.write_all(&response);
            }
        });

        Ok((
            Url::parse(&format!("http://{}/debian/dists/stable/main/", addr))?,
            rx,
        ))
    }

    fn response(status: &str, content_length: usize, body: &[u8]) -> Vec<u8> {
        let mut res = format!(
            "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            status, content_length
        )
        .into_bytes();
        res.extend_from_slice(body);
        res
    }

    fn local_client(url: Url) -> Result<HttpRepositoryClient> {
        let client = Client::builder()
            .no_proxy()
            .build()
            .map_err(|e| ContentsError::Transport(url.to_string(), e))?;

        HttpRepositoryClient::new_client(client, url)
    }

    #[test]
    fn trailing_slash() -> Result<()> {
        let client = HttpRepositoryClient::new(BULLSEYE_CONTRIB_URL)?;
        assert_eq!(
            client.url().as_str(),
            "http://snapshot.debian.org/archive/debian/20211120T085721Z/dists/bullseye/contrib/"
        );
        assert_eq!(
            client.url().join("Contents-all.gz")?.as_str(),
            "http://snapshot.debian.org/archive/debian/20211120T085721Z/dists/bullseye/contrib/Contents-all.gz"
        );

        let client = HttpRepositoryClient::new(DEFAULT_MIRROR_URL)?;
        assert_eq!(client.url().as_str(), DEFAULT_MIRROR_URL);

        Ok(())
    }

    #[test]
    fn invalid_url() {
        assert!(matches!(
            HttpRepositoryClient::new("not a url"),
            Err(ContentsError::HttpUrl(_))
        ));
    }

    #[tokio::test]
    async fn download_gzip_index() -> Result<()> {
        let body = gzip(b"a.txt pkg1\nb.txt pkg1,pkg2\n").await;
        let (url, requests) = serve_once(response("200 OK", body.len(), &body))?;
        let client = local_client(url)?;
        let td = tempfile::tempdir()?;

        let path =
            download_contents_file(&client, &ContentsIndexFetch::new("amd64", false), td.path())
                .await?;
        assert_eq!(path, td.path().join("amd64"));
        assert_eq!(std::fs::read(td.path().join("amd64.gz"))?, body);

        assert_eq!(
            requests.recv().expect("request line should be sent"),
            "GET /debian/dists/stable/main/Contents-amd64.gz HTTP/1.1"
        );

        let contents = ContentsFile::from_path(path)?;
        assert_eq!(
            contents.package_paths("pkg1").collect::<Vec<_>>(),
            vec!["a.txt", "b.txt"]
        );
        assert_eq!(
            contents.package_paths("pkg2").collect::<Vec<_>>(),
            vec!["b.txt"]
        );

        Ok(())
    }

    #[tokio::test]
    async fn missing_index_status() -> Result<()> {
        let (url, _requests) = serve_once(response("404 Not Found", 0, b""))?;
        let client = local_client(url)?;
        let td = tempfile::tempdir()?;

        let res =
            download_contents_file(&client, &ContentsIndexFetch::new("amd64", true), td.path())
                .await;
        assert!(matches!(res, Err(ContentsError::Transport(_, _))));
        assert!(!td.path().join("udeb-amd64.gz").exists());

        Ok(())
    }

    #[tokio::test]
    async fn truncated_body() -> Result<()> {
        let (url, _requests) = serve_once(response("200 OK", 1000, b"partial"))?;
        let client = local_client(url)?;
        let td = tempfile::tempdir()?;

        let res =
            fetch_contents_file(&client, &ContentsIndexFetch::new("amd64", false), td.path())
                .await;

        match res {
            Err(ContentsError::Transport(url, _)) => {
                assert!(url.ends_with("/debian/dists/stable/main/Contents-amd64.gz"));
            }
            other => panic!("expected transport error; got {:?}", other),
        }

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires network access"]
    async fn bullseye_contents() -> Result<()> {
        let client = HttpRepositoryClient::new(BULLSEYE_CONTRIB_URL)?;
        let td = tempfile::tempdir()?;

        let path =
            download_contents_file(&client, &ContentsIndexFetch::new("all", false), td.path())
                .await?;
        let contents = ContentsFile::from_path(path)?;

        let paths = contents
            .package_paths("contrib/utils/zfs-auto-snapshot")
            .collect::<Vec<_>>();
        assert_eq!(paths.len(), 9);
        assert!(paths.contains(&"usr/sbin/zfs-auto-snapshot"));

        Ok(())
    }
}

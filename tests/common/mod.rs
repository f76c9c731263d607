//! Common test utilities for integration tests

use std::fs;
use std::path::Path;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Serves a single HTTP response on a local port and returns the URL to request.
///
/// The body is sent as `application/xml` without a charset.
#[allow(dead_code)]
pub async fn serve_once(status: &'static str, body: &str) -> String {
    serve_bytes(status, "application/xml", body.as_bytes().to_vec()).await
}

/// Serves raw `body` bytes with the given `Content-Type` on a local port.
///
/// The listener accepts exactly one connection, reads the request head and answers
/// with `status` and `body`, then closes the connection.
#[allow(dead_code)]
pub async fn serve_bytes(status: &'static str, content_type: &'static str, body: Vec<u8>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
            if request.windows(4).any(|w| w == b"\r\n\r\n") {
                break;
            }
        }

        let head = format!(
            "HTTP/1.1 {status}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            body.len()
        );
        socket.write_all(head.as_bytes()).await.unwrap();
        socket.write_all(&body).await.unwrap();
        let _ = socket.shutdown().await;
    });

    format!("http://{addr}/iso_3166-1_list_en.xml")
}

/// Client that ignores proxy environment variables so requests stay local.
#[allow(dead_code)]
pub fn local_client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

/// Helper function to create a test file, including parent directories
#[allow(dead_code)]
pub fn create_test_file(path: &Path, content: &str) {
    let parent = path.parent().unwrap();
    fs::create_dir_all(parent).unwrap();
    fs::write(path, content).unwrap();
}

/// Two-country document using short element names
#[allow(dead_code)]
pub const TWO_COUNTRY_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Countries>
  <Entry>
    <name>Germany</name>
    <code>DE</code>
  </Entry>
  <Entry>
    <name>France</name>
    <code>FR</code>
  </Entry>
</Countries>"#;

/// Document in the default ISO 3166-1 layout
#[allow(dead_code)]
pub const ISO_LIST_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ISO_3166-1_List_en xml:lang="en">
  <ISO_3166-1_Entry>
    <ISO_3166-1_Country_name>UNITED STATES</ISO_3166-1_Country_name>
    <ISO_3166-1_Alpha-2_Code_element>US</ISO_3166-1_Alpha-2_Code_element>
  </ISO_3166-1_Entry>
  <ISO_3166-1_Entry>
    <ISO_3166-1_Country_name>CANADA</ISO_3166-1_Country_name>
    <ISO_3166-1_Alpha-2_Code_element>CA</ISO_3166-1_Alpha-2_Code_element>
  </ISO_3166-1_Entry>
  <ISO_3166-1_Entry>
    <ISO_3166-1_Country_name>ALBANIA</ISO_3166-1_Country_name>
    <ISO_3166-1_Alpha-2_Code_element>AL</ISO_3166-1_Alpha-2_Code_element>
  </ISO_3166-1_Entry>
  <ISO_3166-1_Entry>
    <ISO_3166-1_Country_name>ZAMBIA</ISO_3166-1_Country_name>
    <ISO_3166-1_Alpha-2_Code_element>ZM</ISO_3166-1_Alpha-2_Code_element>
  </ISO_3166-1_Entry>
</ISO_3166-1_List_en>"#;

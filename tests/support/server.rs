use std::sync::{Arc, mpsc};
use std::thread;

use cultivar::server;
use cultivar::serving::ModelSource;

/// Start the HTTP shell on an ephemeral port and return its base URL.
///
/// The server thread lives until the test process exits.
pub fn spawn_server(source: Arc<ModelSource>) -> String {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("build runtime");
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                .await
                .expect("bind listener");
            let addr = listener.local_addr().expect("local addr");
            tx.send(addr).expect("send addr");
            server::serve_on(listener, source, std::future::pending())
                .await
                .expect("serve");
        });
    });
    let addr = rx.recv().expect("server address");
    format!("http://{addr}")
}

/// POST a JSON body and return the status code with the parsed JSON response.
pub fn post_json(url: &str, body: &serde_json::Value) -> (u16, serde_json::Value) {
    match ureq::post(url).send_json(body.clone()) {
        Ok(response) => {
            let status = response.status();
            (status, response.into_json().expect("json body"))
        }
        Err(ureq::Error::Status(status, response)) => {
            (status, response.into_json().expect("json error body"))
        }
        Err(err) => panic!("request failed: {err}"),
    }
}

pub fn post_raw(url: &str, body: &str) -> (u16, serde_json::Value) {
    let request = ureq::post(url).set("Content-Type", "application/json");
    match request.send_string(body) {
        Ok(response) => {
            let status = response.status();
            (status, response.into_json().expect("json body"))
        }
        Err(ureq::Error::Status(status, response)) => {
            (status, response.into_json().expect("json error body"))
        }
        Err(err) => panic!("request failed: {err}"),
    }
}

pub fn get_text(url: &str) -> (u16, String) {
    let response = ureq::get(url).call().expect("GET request");
    let status = response.status();
    (status, response.into_string().expect("text body"))
}

//! Demo: watch-URL video id extraction
//!
//! Run with: cargo run -p wlens-models --example video_url_demo

use wlens_models::extract_video_id;

fn main() {
    let test_urls = [
        "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
        "https://youtu.be/dQw4w9WgXcQ?t=30",
        "https://www.youtube.com/watch?v=dQw4w9WgXcQ&list=PLrAXtmRdnEQy",
        "https://www.youtube.com/results?search_query=rust",
        "https://www.youtube.com/playlist?list=PLrAXtmRdnEQy",
        "https://vimeo.com/123456789",
    ];

    for url in test_urls {
        println!("\n{}", "=".repeat(60));
        println!("INPUT: {}", url);

        match extract_video_id(url) {
            Some(id) => {
                println!("video id: {}", id);
                println!("canonical: {}", id.watch_url());
            }
            None => println!("not a watch page"),
        }
    }
}

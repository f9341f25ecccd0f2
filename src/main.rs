//! # Platen CLI
//!
//! Usage:
//!   platen input.json -o output.pdf
//!   echo '{ ... }' | platen -o output.pdf
//!   platen --example > poster.json
//!
//! Set `RUST_LOG=debug` to see assembly and encoding details.

use std::env;
use std::fs;
use std::io::{self, Read};

use platen::PlatenError;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.iter().any(|a| a == "--example") {
        print!("{}", example_document_json());
        return;
    }

    if let Err(e) = run(&args) {
        eprintln!("✗ {}", e);
        std::process::exit(1);
    }
}

fn run(args: &[String]) -> Result<(), PlatenError> {
    let input = if args.len() > 1 && !args[1].starts_with('-') {
        fs::read_to_string(&args[1])?
    } else {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    };

    let output_path = args
        .windows(2)
        .find(|w| w[0] == "-o")
        .map(|w| w[1].clone())
        .unwrap_or_else(|| "output.pdf".to_string());

    let pdf_bytes = platen::render_json(&input)?;
    fs::write(&output_path, &pdf_bytes)?;
    eprintln!("✓ Written {} bytes to {}", pdf_bytes.len(), output_path);
    Ok(())
}

fn example_document_json() -> &'static str {
    r##"{
  "metadata": {
    "title": "Spring Concert",
    "author": "Riverside Choir",
    "creationDate": "2026-03-01T09:30:00+01:00"
  },
  "defaultPageSize": "A5",
  "defaultFont": "Helvetica",
  "defaultFontSize": 12,
  "pages": [
    {
      "contents": [
        {
          "type": "Rectangle",
          "x": 0, "y": 480, "width": 419.53, "height": 115.28,
          "fill": { "r": 0.12, "g": 0.2, "b": 0.35 }
        },
        {
          "type": "Text",
          "content": "Spring Concert",
          "x": 36, "y": 530,
          "font": "Helvetica-Bold", "size": 32,
          "color": { "r": 1, "g": 1, "b": 1 }
        },
        {
          "type": "Text",
          "content": "Saturday 21 March — St. Mary’s Hall",
          "x": 36, "y": 440
        },
        {
          "type": "Path",
          "start": { "x": 36, "y": 425 },
          "operations": [ { "op": "LineTo", "x": 383, "y": 425 } ],
          "stroke": { "r": 0.6, "g": 0.6, "b": 0.6 },
          "strokeWidth": 0.5
        },
        {
          "type": "Shape",
          "subpaths": [
            {
              "start": { "x": 160, "y": 200 },
              "operations": [
                { "op": "LineTo", "x": 260, "y": 200 },
                { "op": "LineTo", "x": 210, "y": 300 }
              ]
            },
            {
              "start": { "x": 190, "y": 220 },
              "operations": [
                { "op": "LineTo", "x": 230, "y": 220 },
                { "op": "LineTo", "x": 210, "y": 260 }
              ]
            }
          ],
          "fill": { "r": 0.85, "g": 0.55, "b": 0.1 },
          "stroke": { "r": 0, "g": 0, "b": 0 }
        },
        {
          "type": "Text",
          "content": "Tickets €12 at the door",
          "x": 36, "y": 60, "font": "Times-Italic", "size": 14,
          "color": { "r": 0.3, "g": 0.3, "b": 0.3 }
        }
      ]
    }
  ]
}
"##
}

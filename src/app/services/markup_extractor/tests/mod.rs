//! Fixtures for markup extractor tests

use crate::app::adapters::publisher::MemoryPublisher;
use crate::app::services::emitter::Emitter;
use crate::app::services::markup_extractor::MarkupExtractor;
use std::sync::Arc;


pub const INLET: [&str; 7] = ["Inlet Temp", "OK", "OK", "High", "OK", "41.2", "degC"];
pub const DIFF_PRESSURE: [&str; 7] = ["Diff-Pressure", "OK", "OK", "OK", "OK", "0.35", "bar"];

/// Build an HTML dump with nine caption cells, layout noise and `channels`
pub fn build_dump(channels: &[[&str; 7]]) -> String {
    let mut html = String::from("<html><body><table><tr><td><table><tr>");
    for i in 0..9 {
        html.push_str(&format!("<td>Caption {}</td>", i));
    }
    html.push_str("</tr></table></td></tr>");
    html.push_str("<tr><td><input type=\"button\" value=\"Ack\"></td><td>&nbsp;</td></tr>");
    for channel in channels {
        html.push_str("<tr>");
        for cell in channel {
            html.push_str(&format!("<td> {} </td>", cell));
        }
        html.push_str("</tr>");
    }
    html.push_str("</table></body></html>");
    html
}

pub fn create_extractor(cells: Vec<String>) -> MarkupExtractor {
    MarkupExtractor::new("Vessel3Collector", "FoulingBench", "Vessel3DataSet.html", cells)
}

/// Cell list of nine captions followed by the given channels
pub fn create_cells(channels: &[[&str; 7]]) -> Vec<String> {
    let mut cells: Vec<String> = (0..9).map(|i| format!("Caption {}", i)).collect();
    for channel in channels {
        cells.extend(channel.iter().map(|cell| cell.to_string()));
    }
    cells
}

/// Emitter recording into a memory publisher
pub fn create_emitter() -> (Emitter, MemoryPublisher) {
    let publisher = MemoryPublisher::new();
    (Emitter::new(Arc::new(publisher.clone()), "output1"), publisher)
}

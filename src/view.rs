use crate::images::{FighterImages, Image};
use crate::navigation::Selection;
use crate::types::{Event, Fight};

pub fn index_bar(selection: &Selection) -> String {
    let markers: Vec<&str> = (0..selection.count)
        .map(|i| if i == selection.selected_index { "[*]" } else { "*" })
        .collect();
    format!("<  {}  >", markers.join(" "))
}

pub fn card(selection: &Selection) -> String {
    let Some(event) = &selection.selected else {
        return "no events loaded".into();
    };
    format!("{}\n{}", index_bar(selection), event_card(event))
}

pub fn event_card(event: &Event) -> String {
    let mut out = format!("Title: {}\nDate: {}\n", event.title, event.date);
    for fight in &event.fights {
        out.push('\n');
        out.push_str(&fight_row(fight));
    }
    out
}

fn fight_row(fight: &Fight) -> String {
    let a = &fight.fighter_a;
    let b = &fight.fighter_b;
    format!(
        "{} ({})  |  Weight: {}  |  {} ({})\n",
        a.name, a.record, fight.weight, b.name, b.record
    )
}

pub fn images_line(name: &str, images: &FighterImages) -> String {
    format!(
        "  {name}: flag {}, portrait {}",
        image_size(images.flag.as_ref()),
        image_size(images.portrait.as_ref())
    )
}

fn image_size(image: Option<&Image>) -> String {
    match image {
        Some(image) => format!("{} bytes", image.bytes.len()),
        None => "-".into(),
    }
}

use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::filter::FilteredView;
use crate::data::model::Listing;

const HEADERS: [&str; 12] = [
    "date_posted",
    "model",
    "model_year",
    "price",
    "odometer",
    "condition",
    "fuel",
    "transmission",
    "type",
    "paint_color",
    "is_4wd",
    "days_listed",
];

/// Collapsible table of the rows currently passing the filters.
pub fn data_overview(ui: &mut Ui, view: &FilteredView) {
    egui::CollapsingHeader::new("Click here to view the data overview")
        .id_salt("data_overview")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            let rows: Vec<&Listing> = view.rows().collect();
            TableBuilder::new(ui)
                .striped(true)
                .resizable(true)
                .max_scroll_height(320.0)
                .columns(Column::auto().at_least(60.0), HEADERS.len())
                .header(20.0, |mut header| {
                    for name in HEADERS {
                        header.col(|ui: &mut Ui| {
                            ui.strong(name);
                        });
                    }
                })
                .body(|body| {
                    body.rows(18.0, rows.len(), |mut row| {
                        let listing = rows[row.index()];
                        for cell in cells(listing) {
                            row.col(|ui: &mut Ui| {
                                ui.label(cell);
                            });
                        }
                    });
                });
        });
}

fn cells(l: &Listing) -> [String; 12] {
    fn opt<T: ToString>(v: &Option<T>) -> String {
        v.as_ref().map(T::to_string).unwrap_or_default()
    }
    [
        l.date_posted.format("%Y-%m-%d %H:%M").to_string(),
        l.model.clone(),
        l.model_year.to_string(),
        l.price.map(|p| format!("{p:.0}")).unwrap_or_default(),
        l.odometer.map(|o| format!("{o:.0}")).unwrap_or_default(),
        opt(&l.condition),
        opt(&l.fuel),
        opt(&l.transmission),
        opt(&l.body_type),
        opt(&l.paint_color),
        opt(&l.is_4wd),
        opt(&l.days_listed),
    ]
}

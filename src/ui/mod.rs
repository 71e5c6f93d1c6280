/// UI building blocks
///
/// The main window is three stacked panels (panels.rs):
/// - Boot status (runtime / model readiness)
/// - The image slot, which doubles as the "choose image" button
/// - The prediction list

pub mod panels;

//! Sample rides bundled into the binary, selectable on upload instead of a file.

pub struct SampleRide {
    pub id: &'static str,
    pub file_name: &'static str,
    pub content: &'static str,
}

pub const SAMPLE_RIDES: [SampleRide; 3] = [
    SampleRide {
        id: "1",
        file_name: "1.gpx",
        content: include_str!("../samples/1.gpx"),
    },
    SampleRide {
        id: "2",
        file_name: "2.gpx",
        content: include_str!("../samples/2.gpx"),
    },
    SampleRide {
        id: "3",
        file_name: "3.tcx",
        content: include_str!("../samples/3.tcx"),
    },
];

pub fn find(id: &str) -> Option<&'static SampleRide> {
    SAMPLE_RIDES.iter().find(|sample| sample.id == id)
}

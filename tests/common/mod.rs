#![allow(dead_code)]
use polars::prelude::*;
use minitrees::Value;


// The classic 14-day weather data.
pub fn weather() -> (DataFrame, Series) {
    let data = df!(
        "outlook" => &[
            "sunny", "sunny", "overcast", "rainy", "rainy", "rainy", "overcast",
            "sunny", "sunny", "rainy", "sunny", "overcast", "overcast", "rainy",
        ],
        "temperature" => &[
            "hot", "hot", "hot", "mild", "cool", "cool", "cool",
            "mild", "cool", "mild", "mild", "mild", "hot", "mild",
        ],
        "humidity" => &[
            "high", "high", "high", "high", "normal", "normal", "normal",
            "high", "normal", "normal", "normal", "high", "normal", "high",
        ],
        "windy" => &[
            false, true, false, false, false, true, true,
            false, false, false, true, true, false, true,
        ],
    ).unwrap();
    (data, play())
}


// The same days, with numeric temperature and humidity.
pub fn numeric_weather() -> (DataFrame, Series) {
    let data = df!(
        "outlook" => &[
            "sunny", "sunny", "overcast", "rainy", "rainy", "rainy", "overcast",
            "sunny", "sunny", "rainy", "sunny", "overcast", "overcast", "rainy",
        ],
        "temperature" => &[
            85.0, 80.0, 83.0, 70.0, 68.0, 65.0, 64.0,
            72.0, 69.0, 75.0, 75.0, 72.0, 81.0, 71.0,
        ],
        "humidity" => &[
            85_i64, 90, 86, 96, 80, 70, 65, 95, 70, 80, 70, 90, 75, 91,
        ],
        "windy" => &[
            false, true, false, false, false, true, true,
            false, false, false, true, true, false, true,
        ],
    ).unwrap();
    (data, play())
}


fn play() -> Series {
    Series::new("play", &[
        "no", "no", "yes", "yes", "yes", "no", "yes",
        "no", "yes", "yes", "yes", "yes", "yes", "no",
    ])
}


pub fn labels(series: &Series) -> Vec<Value> {
    series.utf8()
        .unwrap()
        .into_iter()
        .map(|y| Value::from(y.unwrap()))
        .collect()
}

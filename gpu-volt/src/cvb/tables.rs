//! GM20B calibration data.

use super::CvbCoef;
use crate::Microvolts;

/// Highest speedo id with calibration data.
pub const MAX_SPEEDO: u32 = 4;

/// Minimum voltage per speedo id.
pub const SPEEDO_TO_VMIN: [Microvolts; MAX_SPEEDO as usize + 1] =
    [950000, 840000, 818750, 840000, 810000];

/// Floor voltage applied below the first thermal trip.
pub const THERM_VFLOOR_UV: Microvolts = 950000;

/// Thermal boundaries (°C): DVFS minimum, trips 0 through 3, then a
/// sentinel one degree above trip 3 that is never used as a trip.
pub const THERMAL_BOUNDARIES_C: [i32; 6] = [-40, -10, 20, 60, 90, 91];

/// Extended ("na") model, speedo ids 1 and up.
pub const GM20B_NA_CVB_COEF: [CvbCoef; 13] = [
    //                kHz         c0    c1    c2   c3      c4   c5
    /*  76800 */ CvbCoef::extended(814294, 8144, -940, 808, -21583, 226),
    /* 153600 */ CvbCoef::extended(856185, 8144, -940, 808, -21583, 226),
    /* 230400 */ CvbCoef::extended(898077, 8144, -940, 808, -21583, 226),
    /* 307200 */ CvbCoef::extended(939968, 8144, -940, 808, -21583, 226),
    /* 384000 */ CvbCoef::extended(981860, 8144, -940, 808, -21583, 226),
    /* 460800 */ CvbCoef::extended(1023751, 8144, -940, 808, -21583, 226),
    /* 537600 */ CvbCoef::extended(1065642, 8144, -940, 808, -21583, 226),
    /* 614400 */ CvbCoef::extended(1107534, 8144, -940, 808, -21583, 226),
    /* 691200 */ CvbCoef::extended(1149425, 8144, -940, 808, -21583, 226),
    /* 768000 */ CvbCoef::extended(1191317, 8144, -940, 808, -21583, 226),
    /* 844800 */ CvbCoef::extended(1233208, 8144, -940, 808, -21583, 226),
    /* 921600 */ CvbCoef::extended(1275100, 8144, -940, 808, -21583, 226),
    /* 998400 */ CvbCoef::extended(1316991, 8144, -940, 808, -21583, 226),
];

/// Legacy model, speedo id 0.
pub const GM20B_CVB_COEF: [CvbCoef; 12] = [
    //                kHz      c0        c1     c2
    /*  76800 */ CvbCoef::legacy(1786666, -85625, 1632),
    /* 153600 */ CvbCoef::legacy(1846729, -87525, 1632),
    /* 230400 */ CvbCoef::legacy(1910480, -89425, 1632),
    /* 307200 */ CvbCoef::legacy(1977920, -91325, 1632),
    /* 384000 */ CvbCoef::legacy(2049049, -93215, 1632),
    /* 460800 */ CvbCoef::legacy(2122872, -95095, 1632),
    /* 537600 */ CvbCoef::legacy(2201331, -96985, 1632),
    /* 614400 */ CvbCoef::legacy(2283479, -98885, 1632),
    /* 691200 */ CvbCoef::legacy(2369315, -100785, 1632),
    /* 768000 */ CvbCoef::legacy(2458841, -102685, 1632),
    /* 844800 */ CvbCoef::legacy(2550821, -104555, 1632),
    /* 921600 */ CvbCoef::legacy(2647676, -106455, 1632),
];

//! City 主题提示词
//!
//! 以 0.05 为步长, 从 0.0 到 1.0

pub(crate) const CITY_PROMPTS: [&str; 21] = [
    // 0.0
    "White car interior, standard office workspace, office chair, basic lighting, connectivity features, office environment, display screen, white background, side view, KIA design",
    // 0.05
    "Modern white car interior, enhanced office workspace, comfortable office chair, good lighting, connectivity hub, practical office environment, display screen, white background, side view, KIA design concept",
    // 0.1
    "Modern white car interior, mobile workspace, ergonomic office chair, good lighting system, connectivity hub, functional office environment, display screen, white background, side view, KIA design concept",
    // 0.15
    "Modern white car interior, mobile office space, ergonomic office chair, quality lighting system, connectivity center, functional office environment, display screen, white background, side view, KIA design concept",
    // 0.2
    "Contemporary white car interior, mobile office space, ergonomic office chair, quality lighting system, connectivity center, practical office environment, integrated display, white background, side view, KIA design concept",
    // 0.25
    "Contemporary white car interior, mobile office setup, ergonomic office chair, enhanced lighting system, digital connectivity center, practical office environment, integrated display, white background, side view, KIA design concept",
    // 0.3
    "Sleek white car interior, mobile office setup, ergonomic office chair, enhanced lighting system, digital connectivity center, comfortable office environment, integrated display array, white background, side view, KIA design concept",
    // 0.35
    "Sleek white car interior, mobile officepod, premium ergonomic chair, enhanced lighting system, digital connectivity center, comfortable office environment, integrated display array, white background, detailed side view, KIA design concept",
    // 0.4
    "Advanced white car interior, mobile officepod, premium ergonomic chair, studio lighting system, digital connectivity center, comfortable office environment, integrated display array, white studio background, detailed side view, KIA concept design",
    // 0.45
    "Advanced white car interior, officepod design, premium ergonomic chair, studio lighting system, digital connectivity center, luxury office environment, integrated display array, white studio background, detailed side view, KIA concept design",
    // 0.5
    "Innovative white car interior, officepod setup, premium ergonomic office chair, studio lighting system, digital connectivity center, luxury office environment, integrated display array, conference feature, white studio background, detailed side view, KIA concept design",
    // 0.55
    "Innovative white concept car interior, officepod workspace, premium ergonomic office chair, professional lighting, digital connectivity center, luxury office environment, integrated display array, conference capability, white studio background, detailed side view, KIA concept design",
    // 0.6
    "Futuristic white concept car interior, officepod workspace, premium ergonomic office chair, professional lighting, connectivity command center, luxury office environment, integrated display array, conference capability, white studio background, side view visualization, KIA concept design",
    // 0.65
    "Futuristic white concept car interior, officepod premium, premium ergonomic office chair, studio lighting, connectivity command center, luxury office environment, immersive display array, conference capability, file storage, white studio background, side view visualization, KIA concept design",
    // 0.7
    "Futuristic white concept car interior, officepod premium, premium ergonomic office chair, comprehensive studio lighting, connectivity command center, luxury executive office environment, immersive display array, conference capability, built-in file storage, white studio background, side view visualization, KIA concept design",
    // 0.75
    "Futuristic white concept car interior, officepod advanced, premium ergonomic office chair, comprehensive studio lighting, connectivity command center, luxury executive office environment, immersive display array, conference capability, built-in file storage, high-quality render, white studio background, side view visualization, KIA concept design",
    // 0.8
    "Futuristic white concept car interior, officepod_v1, premium ergonomic office chair, comprehensive studio lighting, state-of-art connectivity command center, luxury executive office environment, immersive display array, conference capability, built-in file storage, high-quality detailed render, white studio background, side view visualization, KIA concept design",
    // 0.85
    "Futuristic white concept car interior, officepod_v1 pro, premium ergonomic office chair, comprehensive studio lighting, state-of-art connectivity command center, luxury executive office environment, immersive display array, conference capability, built-in file storage, high-quality detailed render, white studio background, side view visualization, KIA concept design",
    // 0.9
    "Futuristic white concept car interior, officepod_v1 professional, premium ergonomic office chair, comprehensive studio lighting, state-of-art connectivity command center, luxury executive office environment, immersive display array, conference capabilities, built-in file storage, high-quality detailed render, white studio background, side view visualization, KIA concept design",
    // 0.95
    "Futuristic white concept car interior, officepod_v1 ultimate, premium ergonomic office chair workspace, comprehensive studio lighting, state-of-art connectivity command center, luxury executive office environment, immersive display array, conference capabilities, built-in file storage, high-quality detailed render, white studio background, side view visualization, KIA concept design",
    // 1.0
    "Futuristic white concept car interior, officepod_v1 ultimate, complete mobile office suite, expansive executive desk workspace, premium ergonomic office chair, comprehensive studio lighting, state-of-art connectivity command center, luxury executive office environment, immersive display array, conference capabilities, built-in file storage, high-quality detailed render, white studio background, side view visualization, KIA concept design",
];

use crate::auth::hash_password;
use crate::domain::Role;
use crate::models::{inventory_item, user};
use crate::services::timestamp;
use sea_orm::*;

const CIVIL: &str = "CIVIL ENGINEERING TOOLROOM";
const ELECTRONICS: &str = "ELECTRONICS ENGINEERING TOOLROOM";
const CHEMISTRY: &str = "CHEMISTRY LABORATORY TOOLROOM";
const ELECTRICAL: &str = "ELECTRICAL ENGINEERING TOOLROOM";
const PHYSICS: &str = "PHYSICS LABORATORY TOOLROOM";

/// (username, email, display name)
const ADMINISTRATORS: &[(&str, &str, &str)] = &[
    ("admin1", "admin1@ue.edu.ph", "Administrator 1"),
    ("admin2", "admin2@ue.edu.ph", "Administrator 2"),
    ("admin3", "admin3@ue.edu.ph", "Administrator 3"),
    ("admin4", "admin4@ue.edu.ph", "Administrator 4"),
    ("admin5", "admin5@ue.edu.ph", "Administrator 5"),
];

const PROFESSORS: &[(&str, &str, &str)] = &[
    ("john.trinidad", "johnvincent.trinidad@ue.edu.ph", "Engr. John Vincent Trinidad"),
    ("nelson.rodelas", "nelson.rodelas@ue.edu.ph", "Dr. Nelson Rodelas"),
    ("joan.lazaro", "joan.lazaro@ue.edu.ph", "Dr. Joan Lazaro"),
    ("regie.david", "regie.david@ue.edu.ph", "Engr. Regie David"),
    ("arriane.cabreros", "arriane.cabreros@ue.edu.ph", "Engr. Arriane Cabreros"),
    ("alexis.rubio", "alexisjohn.rubio@ue.edu.ph", "Dr. Alexis John Rubio"),
    ("paraluman.sim", "paraluman.sim@ue.edu.ph", "Dr. Paraluman Sim"),
    ("ryan.francisco", "ryan.francisco@ue.edu.ph", "Engr. Ryan Francisco"),
    ("benedict.zurbito", "benedict.zurbito@ue.edu.ph", "Engr. Benedict Zurbito"),
    ("marjon.umbay", "marjon.umbay@ue.edu.ph", "Engr. Marjon Umbay"),
    ("ronnel.agulto", "ronnel.agulto@ue.edu.ph", "Engr. Ronnel Agulto"),
    ("kent.aglibar", "kentdarryl.aglibar@ue.edu.ph", "Engr. Kent Darryl Aglibar"),
];

/// Items that were catalogued once and must not come back
const RETIRED_ITEMS: &[(&str, &str)] = &[(CHEMISTRY, "Volumetric Flask")];

/// (department, item, total quantity, max per student, description)
const CATALOGUE: &[(&str, &str, i32, i32, &str)] = &[
    (CIVIL, "Measuring Tape", 22, 2, "Retractable tape for distance and layout measurements. Retract fully after use."),
    (CIVIL, "Level Tool", 16, 2, "Spirit level for checking horizontal and vertical alignment."),
    (CIVIL, "Compass", 14, 2, "Magnetic compass for bearings in surveying. Keep away from metal objects."),
    (CIVIL, "Theodolite", 6, 1, "Precision instrument for measuring horizontal and vertical angles."),
    (CIVIL, "Tripod", 12, 2, "Adjustable tripod for levels and theodolites."),
    (CIVIL, "Survey Rod", 20, 3, "Graduated rod used with levels to read elevation differences."),
    (CIVIL, "Plumb Bob", 18, 2, "Weighted line for establishing true vertical."),
    (CIVIL, "Trowel", 25, 3, "Hand trowel for mortar and concrete finishing."),
    (CIVIL, "Hammer", 20, 2, "General purpose claw hammer."),
    (CIVIL, "Shovel", 15, 2, "Shovel for soil sampling and site work."),
    (CIVIL, "Safety Helmet", 30, 4, "Hard hat required on all field exercises."),
    (CIVIL, "Measuring Wheel", 10, 1, "Wheel for measuring long distances along the ground."),
    (CIVIL, "Clinometer", 8, 1, "Instrument for measuring slope angles."),
    (CIVIL, "Ruler", 35, 4, "Steel ruler for drafting and small measurements."),
    (CIVIL, "Square Ruler", 28, 3, "Carpenter's square for right-angle layout."),
    (CIVIL, "Chalk Line", 24, 3, "Chalk reel for marking straight lines on surfaces."),
    (CIVIL, "Dumpy Level", 7, 1, "Optical level for establishing horizontal planes."),
    (ELECTRONICS, "Multimeter", 20, 2, "Digital multimeter for voltage, current and resistance."),
    (ELECTRONICS, "Oscilloscope", 8, 1, "Two-channel oscilloscope for waveform analysis."),
    (ELECTRONICS, "Function Generator", 10, 1, "Signal source for sine, square and triangle waves."),
    (ELECTRONICS, "Power Supply", 15, 2, "Variable DC bench power supply."),
    (ELECTRONICS, "Breadboard", 30, 3, "Solderless breadboard for circuit prototyping."),
    (ELECTRONICS, "Soldering Iron", 18, 2, "Temperature-controlled soldering iron with stand."),
    (ELECTRONICS, "IC Chip", 6, 1, "Assorted logic and op-amp integrated circuits."),
    (ELECTRONICS, "Jumper Wires", 25, 3, "Bundle of male-to-male jumper wires."),
    (ELECTRONICS, "Resistor", 40, 5, "Resistor kit covering common E12 values."),
    (ELECTRONICS, "Capacitor", 35, 4, "Ceramic and electrolytic capacitor kit."),
    (ELECTRONICS, "Diode", 8, 1, "Rectifier and signal diode assortment."),
    (ELECTRONICS, "Transistor", 15, 2, "NPN and PNP transistor assortment."),
    (ELECTRONICS, "LED", 30, 4, "Assorted indicator LEDs."),
    (ELECTRONICS, "Protoboard", 20, 2, "Perforated board for permanent prototypes."),
    (ELECTRONICS, "Switch", 25, 3, "Toggle, push-button and slide switches."),
    (ELECTRONICS, "Relay", 12, 2, "5V and 12V electromechanical relays."),
    (ELECTRONICS, "Inductor", 18, 2, "Inductor assortment for filter experiments."),
    (CHEMISTRY, "Alcohol Lamp", 15, 2, "Glass alcohol burner for low-temperature heating."),
    (CHEMISTRY, "Balance Scale", 8, 1, "Analytical balance. Calibrate before each session."),
    (CHEMISTRY, "Beaker", 30, 4, "Borosilicate beakers in assorted volumes."),
    (CHEMISTRY, "Bunsen Burner", 12, 1, "Gas burner for heating and sterilisation."),
    (CHEMISTRY, "Burette", 18, 2, "Graduated burette for titrations."),
    (CHEMISTRY, "Crucible", 16, 2, "Porcelain crucible for high-temperature heating."),
    (CHEMISTRY, "Evaporating Dish", 20, 2, "Porcelain dish for evaporating solutions."),
    (CHEMISTRY, "Flask", 25, 3, "Erlenmeyer flasks in assorted volumes."),
    (CHEMISTRY, "Funnel", 32, 4, "Glass funnel for filtration and transfer."),
    (CHEMISTRY, "Graduated Cylinder", 35, 4, "Graduated cylinder for volume measurement."),
    (CHEMISTRY, "Litmus Paper", 50, 10, "Red and blue litmus strips."),
    (CHEMISTRY, "pH Meter", 10, 1, "Digital pH meter. Rinse probe after use."),
    (CHEMISTRY, "Pipette", 22, 3, "Volumetric and graduated pipettes."),
    (CHEMISTRY, "Test Tube", 40, 5, "Borosilicate test tubes."),
    (CHEMISTRY, "Thermometer", 28, 3, "Laboratory thermometer, -10 to 110 C."),
    (CHEMISTRY, "Wire Gauze", 20, 2, "Ceramic-centred gauze for even heating."),
    (ELECTRICAL, "Multimeter", 18, 2, "Digital multimeter rated for mains work."),
    (ELECTRICAL, "Clamp Meter", 10, 1, "Clamp-on ammeter for non-contact current readings."),
    (ELECTRICAL, "Voltage Tester", 25, 3, "Non-contact voltage detector."),
    (ELECTRICAL, "Wire Stripper", 20, 2, "Adjustable wire stripper."),
    (ELECTRICAL, "Circuit Breaker", 15, 2, "Miniature circuit breakers for panel exercises."),
    (ELECTRICAL, "Insulation Tester", 8, 1, "Megohmmeter for insulation resistance."),
    (ELECTRICAL, "Ammeter", 12, 2, "Analog panel ammeter."),
    (ELECTRICAL, "Voltmeter", 14, 2, "Analog panel voltmeter."),
    (ELECTRICAL, "Ohmmeter", 16, 2, "Dedicated resistance meter."),
    (ELECTRICAL, "Wire Cutter", 22, 3, "Diagonal cutting pliers."),
    (ELECTRICAL, "Screwdriver Set", 30, 4, "Insulated screwdriver set."),
    (ELECTRICAL, "Safety Gloves", 40, 5, "Insulated gloves for live-circuit work."),
    (ELECTRICAL, "Cable Ties", 50, 10, "Nylon cable ties."),
    (ELECTRICAL, "Cable Harness", 18, 2, "Pre-terminated wiring harness for trainers."),
    (ELECTRICAL, "Terminal Block", 24, 3, "Screw terminal blocks for panel wiring."),
    (ELECTRICAL, "Fuse", 35, 5, "Assorted cartridge fuses."),
    (ELECTRICAL, "Motor Starter", 10, 1, "Direct-on-line motor starter."),
    (PHYSICS, "Meter Stick", 15, 2, "One-metre wooden rule."),
    (PHYSICS, "Spring Balance", 10, 2, "Spring scale for force measurement."),
    (PHYSICS, "Pulley", 20, 3, "Clamp-on pulley for mechanics setups."),
    (PHYSICS, "Inclined Plane", 8, 1, "Adjustable ramp for friction and acceleration labs."),
    (PHYSICS, "Pendulum", 12, 2, "Simple pendulum kit with assorted bobs."),
    (PHYSICS, "Laser Pointer", 5, 1, "Class 2 laser for optics experiments. Never aim at eyes."),
    (PHYSICS, "Vernier Caliper", 18, 2, "Vernier caliper, 0.02 mm resolution."),
    (PHYSICS, "Thermometer", 25, 3, "Laboratory thermometer for heat experiments."),
    (PHYSICS, "Stopwatch", 10, 1, "Digital stopwatch."),
    (PHYSICS, "Barometer", 6, 1, "Aneroid barometer."),
    (PHYSICS, "Protractor", 30, 2, "Clear protractor for angle measurement."),
    (PHYSICS, "Magnet", 22, 3, "Bar and horseshoe magnets."),
    (PHYSICS, "Prism", 8, 1, "Glass prism for dispersion experiments."),
    (PHYSICS, "Lens Set", 12, 2, "Convex and concave lens set."),
    (PHYSICS, "Force Meter", 16, 2, "Newton meter for force measurement."),
    (PHYSICS, "Optical Bench", 4, 1, "Optical rail with lens and screen holders."),
];

/// Seed staff accounts and the toolroom catalogue
pub async fn seed_defaults(db: &DatabaseConnection, staff_password: &str) -> Result<(), DbErr> {
    let accounts = seed_staff_accounts(db, staff_password).await?;
    tracing::info!("Seeded {} staff accounts", accounts);

    let items = seed_inventory(db).await?;
    if items > 0 {
        tracing::info!("Seeded {} inventory items across all toolrooms", items);
    } else {
        tracing::info!("Inventory items already exist, skipping catalogue seed");
    }

    Ok(())
}

/// Create missing administrator and professor accounts. Returns how many were created.
pub async fn seed_staff_accounts(db: &DatabaseConnection, password: &str) -> Result<usize, DbErr> {
    let staff = ADMINISTRATORS
        .iter()
        .map(|a| (a, Role::Administrator))
        .chain(PROFESSORS.iter().map(|p| (p, Role::Professor)));

    let mut created = 0;
    for (&(username, email, name), role) in staff {
        let exists = user::Entity::find()
            .filter(
                Condition::any()
                    .add(user::Column::Email.eq(email))
                    .add(user::Column::Username.eq(username)),
            )
            .one(db)
            .await?
            .is_some();

        if exists {
            continue;
        }

        let password_hash = hash_password(password).map_err(DbErr::Custom)?;
        let account = user::ActiveModel {
            username: Set(username.to_owned()),
            email: Set(email.to_owned()),
            password_hash: Set(password_hash),
            role: Set(role.as_str().to_owned()),
            name: Set(name.to_owned()),
            student_number: Set(String::new()),
            created_at: Set(timestamp()),
            // Staff accounts are pre-verified
            is_email_verified: Set(true),
            failed_login_attempts: Set(0),
            locked_until: Set(None),
            ..Default::default()
        };
        account.insert(db).await?;
        tracing::debug!("Created default {} account: {}", role.as_str(), username);
        created += 1;
    }

    Ok(created)
}

/// Insert the catalogue into an empty inventory. Returns how many items were inserted.
pub async fn seed_inventory(db: &DatabaseConnection) -> Result<usize, DbErr> {
    for &(department, item_name) in RETIRED_ITEMS {
        let removed = inventory_item::Entity::delete_many()
            .filter(inventory_item::Column::Department.eq(department))
            .filter(inventory_item::Column::ItemName.eq(item_name))
            .exec(db)
            .await?;
        if removed.rows_affected > 0 {
            tracing::info!("Removed retired item '{}' from {}", item_name, department);
        }
    }

    if inventory_item::Entity::find().count(db).await? > 0 {
        return Ok(0);
    }

    let now = timestamp();
    let rows = CATALOGUE
        .iter()
        .map(
            |&(department, item_name, total, max_per_student, description)| {
                inventory_item::ActiveModel {
                    department: Set(department.to_owned()),
                    item_name: Set(item_name.to_owned()),
                    description: Set(description.to_owned()),
                    total_quantity: Set(total),
                    available_quantity: Set(total),
                    max_per_student: Set(max_per_student),
                    is_active: Set(true),
                    created_at: Set(now.clone()),
                    last_updated: Set(now.clone()),
                    ..Default::default()
                }
            },
        );

    inventory_item::Entity::insert_many(rows).exec(db).await?;

    Ok(CATALOGUE.len())
}

//! The fixed catalog of built-in ministries and the seat-count rules.
//!
//! Ministry ids are stable keys: results, selections, overrides and
//! pre-registrations all refer to them, and the seat-count rules below
//! key on specific ids.

use std::sync::LazyLock;

use crate::model::{Category, Ministry, Seat, SeatKind, SeatOverrides};

/// Youth outdoor clubs always elect a fixed panel of three.
const FIXED_PANEL_CLUBS: [&str; 2] = ["desbravadores", "aventureiros"];
const FIXED_PANEL_SIZE: u32 = 3;

/// Deacons and deaconesses: configurable, fifteen by default.
const DEACON_MINISTRIES: [&str; 2] = ["diaconos", "diaconisas"];
const DEFAULT_DEACON_SEATS: u32 = 15;

/// Elders: configurable, four by default.
const ELDERS: &str = "anciao";
const DEFAULT_ELDER_SEATS: u32 = 4;

/// Seat count assumed for an id nothing knows about.
const UNKNOWN_MINISTRY_SEATS: u32 = 2;

struct BuiltIn {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    category: Category,
    seats: &'static [(&'static str, &'static str, SeatKind)],
    explanation: &'static str,
}

static CATALOG: LazyLock<Vec<Ministry>> =
    LazyLock::new(|| BUILT_IN.iter().map(BuiltIn::to_ministry).collect());

impl BuiltIn {
    fn to_ministry(&self) -> Ministry {
        Ministry {
            id: self.id.to_string(),
            name: self.name.to_string(),
            description: self.description.to_string(),
            explanation: self.explanation.to_string(),
            category: self.category,
            seats: self
                .seats
                .iter()
                .map(|(id, name, kind)| Seat {
                    id: (*id).to_string(),
                    name: (*name).to_string(),
                    kind: *kind,
                })
                .collect(),
        }
    }
}

/// The built-in ministries, in presentation order.
pub fn built_in_ministries() -> &'static [Ministry] {
    &CATALOG
}

/// Looks up a built-in ministry by id.
pub fn find_built_in(id: &str) -> Option<&'static Ministry> {
    CATALOG.iter().find(|m| m.id == id)
}

/// Effective number of seats to fill for a ministry.
///
/// Rules, in order:
/// 1. the youth clubs always elect three, overrides are ignored;
/// 2. deacons and deaconesses use the override, else fifteen;
/// 3. elders use the override, else four;
/// 4. anything else has as many seats as it defines (custom ministries
///    included), or two when the id is unknown.
///
/// Never returns less than one.
pub fn seat_count(ministry_id: &str, overrides: &SeatOverrides, custom: &[Ministry]) -> u32 {
    let count = if FIXED_PANEL_CLUBS.contains(&ministry_id) {
        FIXED_PANEL_SIZE
    } else if DEACON_MINISTRIES.contains(&ministry_id) {
        overrides
            .get(ministry_id)
            .copied()
            .unwrap_or(DEFAULT_DEACON_SEATS)
    } else if ministry_id == ELDERS {
        overrides
            .get(ministry_id)
            .copied()
            .unwrap_or(DEFAULT_ELDER_SEATS)
    } else {
        find_built_in(ministry_id)
            .or_else(|| custom.iter().find(|m| m.id == ministry_id))
            .map_or(UNKNOWN_MINISTRY_SEATS, |m| {
                u32::try_from(m.seats.len()).unwrap_or(u32::MAX)
            })
    };
    count.max(1)
}

/// Whether the committee may override the seat count of this ministry.
pub fn has_configurable_seats(ministry_id: &str) -> bool {
    DEACON_MINISTRIES.contains(&ministry_id) || ministry_id == ELDERS
}

const fn director_pair(
    director: &'static str,
    director_name: &'static str,
    associate: &'static str,
    associate_name: &'static str,
) -> [(&'static str, &'static str, SeatKind); 2] {
    [
        (director, director_name, SeatKind::Director),
        (associate, associate_name, SeatKind::AssociateDirector),
    ]
}

const SABBATH_SCHOOL: [(&str, &str, SeatKind); 2] = director_pair(
    "es-diretor",
    "Sabbath School Director",
    "es-associado",
    "Sabbath School Associate Director",
);
const PERSONAL_MINISTRIES: [(&str, &str, SeatKind); 2] = director_pair(
    "mp-diretor",
    "Personal Ministries Director",
    "mp-associado",
    "Personal Ministries Associate Director",
);
const YOUTH: [(&str, &str, SeatKind); 2] = director_pair(
    "jovens-diretor",
    "Youth Director",
    "jovens-associado",
    "Youth Associate Director",
);
const CHILDREN: [(&str, &str, SeatKind); 2] = director_pair(
    "criancas-diretor",
    "Children's Ministries Director",
    "criancas-associado",
    "Children's Ministries Associate Director",
);
const TEENS: [(&str, &str, SeatKind); 2] = director_pair(
    "adolescentes-diretor",
    "Teen Ministries Director",
    "adolescentes-associado",
    "Teen Ministries Associate Director",
);
const WOMEN: [(&str, &str, SeatKind); 2] = director_pair(
    "mulheres-diretora",
    "Women's Ministries Director",
    "mulheres-associada",
    "Women's Ministries Associate Director",
);
const MEN: [(&str, &str, SeatKind); 2] = director_pair(
    "homens-diretor",
    "Men's Ministries Director",
    "homens-associado",
    "Men's Ministries Associate Director",
);
const FAMILY: [(&str, &str, SeatKind); 2] = director_pair(
    "familia-diretor",
    "Family Ministries Director",
    "familia-associado",
    "Family Ministries Associate Director",
);
const MUSIC: [(&str, &str, SeatKind); 2] = director_pair(
    "musica-diretor",
    "Music Director",
    "musica-associado",
    "Music Associate Director",
);
const COMMUNICATION: [(&str, &str, SeatKind); 2] = director_pair(
    "comunicacao-diretor",
    "Communication Director",
    "comunicacao-associado",
    "Communication Associate Director",
);
const STEWARDSHIP: [(&str, &str, SeatKind); 2] = director_pair(
    "mordomia-diretor",
    "Stewardship Director",
    "mordomia-associado",
    "Stewardship Associate Director",
);
const PUBLISHING: [(&str, &str, SeatKind); 2] = director_pair(
    "publicacoes-diretor",
    "Publishing Director",
    "publicacoes-associado",
    "Publishing Associate Director",
);
const EDUCATION: [(&str, &str, SeatKind); 2] = director_pair(
    "educacao-diretor",
    "Education Director",
    "educacao-associado",
    "Education Associate Director",
);
const HEALTH: [(&str, &str, SeatKind); 2] = director_pair(
    "saude-diretor",
    "Health Ministries Director",
    "saude-associado",
    "Health Ministries Associate Director",
);
const COMMUNITY_SERVICE: [(&str, &str, SeatKind); 2] = director_pair(
    "asa-diretor",
    "Community Services Director",
    "asa-associado",
    "Community Services Associate Director",
);
const RELIGIOUS_LIBERTY: [(&str, &str, SeatKind); 2] = director_pair(
    "liberdade-diretor",
    "Religious Liberty Director",
    "liberdade-associado",
    "Religious Liberty Associate Director",
);
const UNIVERSITY: [(&str, &str, SeatKind); 2] = director_pair(
    "universitario-diretor",
    "University Ministries Director",
    "universitario-associado",
    "University Ministries Associate Director",
);
const HOSPITALITY: [(&str, &str, SeatKind); 2] = director_pair(
    "recepcao-diretor",
    "Hospitality Director",
    "recepcao-associado",
    "Hospitality Associate Director",
);

static BUILT_IN: &[BuiltIn] = &[
    // Leadership
    BuiltIn {
        id: "anciao",
        name: "Elders",
        description: "Spiritual and administrative care of the local church",
        category: Category::Leadership,
        seats: &[
            ("anciao-1", "First Elder", SeatKind::Elder),
            ("anciao-2", "Second Elder", SeatKind::Elder),
            ("anciao-3", "Third Elder", SeatKind::Elder),
            ("anciao-4", "Fourth Elder", SeatKind::Elder),
        ],
        explanation: "Elders assist the pastor in running the church and caring for its members. \
            They visit members, lead ceremonies such as baptisms, weddings and communion, and give \
            spiritual counsel. They are expected to be an example of Christian life inside and outside the church.",
    },
    BuiltIn {
        id: "diaconos",
        name: "Deacons",
        description: "Practical service at meetings and care of church property",
        category: Category::Leadership,
        seats: &[("diacono-principal", "Head Deacon", SeatKind::Principal)],
        explanation: "Deacons look after the practical side of services and events: preparing the \
            pulpit and communion table, the baptistry, welcoming visitors, keeping the building in \
            order and helping serve communion.",
    },
    BuiltIn {
        id: "diaconisas",
        name: "Deaconesses",
        description: "Practical service at meetings and care of church property",
        category: Category::Leadership,
        seats: &[("diaconisa-principal", "Head Deaconess", SeatKind::Principal)],
        explanation: "Deaconesses look after the practical side of services and events: preparing \
            the pulpit and communion table, the baptistry, welcoming visitors, keeping the building \
            in order and helping serve communion.",
    },
    BuiltIn {
        id: "secretaria",
        name: "Clerk",
        description: "Official records and documentation of the church",
        category: Category::Leadership,
        seats: &[
            ("secretario-1", "First Clerk", SeatKind::Secretary),
            ("secretario-2", "Second Clerk", SeatKind::Secretary),
        ],
        explanation: "The clerk keeps the membership book, minutes of business meetings, transfers, \
            baptisms, weddings and discipline records up to date, prepares statistical reports and \
            handles official correspondence.",
    },
    BuiltIn {
        id: "tesouraria",
        name: "Treasury",
        description: "Administers the financial resources of the church",
        category: Category::Leadership,
        seats: &[
            ("tesoureiro-1", "First Treasurer", SeatKind::Treasurer),
            ("tesoureiro-2", "Second Treasurer", SeatKind::Treasurer),
        ],
        explanation: "The treasurer receives and counts tithes and offerings, pays bills, prepares \
            monthly financial reports and accounts to the church board. The role needs integrity, \
            organisation and basic bookkeeping.",
    },
    // Ministries and departments
    BuiltIn {
        id: "escola-sabatina",
        name: "Sabbath School",
        description: "Religious instruction, discipleship and spiritual growth",
        category: Category::Ministry,
        seats: &SABBATH_SCHOOL,
        explanation: "Sabbath School is the main religious education system of the church, held \
            every Sabbath before the service and split into classes by age. The director coordinates \
            the classes, chooses teachers and provides study material.",
    },
    BuiltIn {
        id: "ministerio-pessoal",
        name: "Personal Ministries",
        description: "Carries the mandate of sharing the gospel with everyone",
        category: Category::Ministry,
        seats: &PERSONAL_MINISTRIES,
        explanation: "Personal Ministries coordinates outreach: literature, Bible studies, small \
            groups, evangelistic campaigns and training members to witness.",
    },
    BuiltIn {
        id: "jovens",
        name: "Youth Ministries",
        description: "Spiritual and social development of young people",
        category: Category::Ministry,
        seats: &YOUTH,
        explanation: "Youth Ministries works with teenagers and young adults through special \
            programs, congresses, retreats, mission projects and healthy social activities.",
    },
    BuiltIn {
        id: "aventureiros",
        name: "Adventurer Club",
        description: "Recreational and spiritual activities for children aged 6 to 9",
        category: Category::Club,
        seats: &[
            ("aventureiros-diretor", "Adventurer Director", SeatKind::Director),
            ("aventureiros-associado-1", "Adventurer Associate Director 1", SeatKind::AssociateDirector),
            ("aventureiros-associado-2", "Adventurer Associate Director 2", SeatKind::AssociateDirector),
        ],
        explanation: "The Adventurer Club combines play with Bible teaching for children aged 6 to \
            9 through crafts, stories, music and outdoor activities.",
    },
    BuiltIn {
        id: "desbravadores",
        name: "Pathfinder Club",
        description: "Physical, mental and spiritual development for ages 10 to 15",
        category: Category::Club,
        seats: &[
            ("desbravadores-diretor", "Pathfinder Director", SeatKind::Director),
            ("desbravadores-associado-1", "Pathfinder Associate Director 1", SeatKind::AssociateDirector),
            ("desbravadores-associado-2", "Pathfinder Associate Director 2", SeatKind::AssociateDirector),
        ],
        explanation: "The Pathfinder Club runs a structured program of camping, knots, nature study, \
            drill, progressive classes and honors for ages 10 to 15, building leadership and teamwork.",
    },
    BuiltIn {
        id: "criancas",
        name: "Children's Ministries",
        description: "Helps children grow in faith and character",
        category: Category::Ministry,
        seats: &CHILDREN,
        explanation: "Children's Ministries coordinates children's worship, special programs, \
            teacher training for the children's Sabbath School and seasonal events.",
    },
    BuiltIn {
        id: "adolescentes",
        name: "Teen Ministries",
        description: "Focused on the needs of teenagers",
        category: Category::Ministry,
        seats: &TEENS,
        explanation: "Teen Ministries serves ages 13 to 17 with dedicated classes, discussion \
            groups, retreats, camps and mission projects.",
    },
    BuiltIn {
        id: "mulheres",
        name: "Women's Ministries",
        description: "Spiritual and social development of women",
        category: Category::Ministry,
        seats: &WOMEN,
        explanation: "Women's Ministries strengthens women in the church and community through \
            meetings, seminars, retreats and social projects.",
    },
    BuiltIn {
        id: "homens",
        name: "Men's Ministries",
        description: "Spiritual development and leadership of men",
        category: Category::Ministry,
        seats: &MEN,
        explanation: "Men's Ministries helps men lead at home and in the church through retreats, \
            Bible study, community service and mentoring.",
    },
    BuiltIn {
        id: "familia",
        name: "Family Ministries",
        description: "Biblical teaching on family and unity in the home",
        category: Category::Ministry,
        seats: &FAMILY,
        explanation: "Family Ministries runs seminars on marriage and parenting, family worship \
            resources, couples' retreats and events that bring generations together.",
    },
    BuiltIn {
        id: "musica",
        name: "Music Ministry",
        description: "Musical liturgy of services and programs",
        category: Category::Ministry,
        seats: &MUSIC,
        explanation: "The Music Ministry coordinates choir, vocal groups, instrumentalists and \
            congregational singing, choosing music for each program and training musicians.",
    },
    BuiltIn {
        id: "comunicacao",
        name: "Communication",
        description: "Media and communication in service of the gospel",
        category: Category::Ministry,
        seats: &COMMUNICATION,
        explanation: "Communication manages social media, website, bulletins, announcements, live \
            streams and recordings, keeping members informed and reaching the community.",
    },
    BuiltIn {
        id: "mordomia",
        name: "Stewardship",
        description: "Spiritual growth and systematic benevolence",
        category: Category::Ministry,
        seats: &STEWARDSHIP,
        explanation: "Stewardship teaches the biblical management of time, talents, health and \
            money, and promotes faithfulness in tithes and offerings.",
    },
    BuiltIn {
        id: "publicacoes",
        name: "Publishing Ministries",
        description: "Distributes publications for physical, mental and spiritual well-being",
        category: Category::Ministry,
        seats: &PUBLISHING,
        explanation: "Publishing Ministries promotes books and magazines, supports literature \
            evangelists, organises book fairs and encourages reading among members.",
    },
    BuiltIn {
        id: "educacao",
        name: "Education",
        description: "Promotes church education and supports its schools",
        category: Category::Ministry,
        seats: &EDUCATION,
        explanation: "Education promotes the church's school network, helps students with \
            scholarships and keeps the church connected to its educational institutions.",
    },
    BuiltIn {
        id: "saude",
        name: "Health Ministries",
        description: "Health principles and healthy living",
        category: Category::Ministry,
        seats: &HEALTH,
        explanation: "Health Ministries organises talks, vegetarian cooking classes, stop-smoking \
            programs and community health fairs.",
    },
    BuiltIn {
        id: "servico-comunitario",
        name: "Community Services",
        description: "Social action and care for the community",
        category: Category::Ministry,
        seats: &COMMUNITY_SERVICE,
        explanation: "Community Services coordinates food, clothing and blanket distribution, free \
            clinics, literacy and vocational courses, and support for communities in need.",
    },
    BuiltIn {
        id: "liberdade-religiosa",
        name: "Religious Liberty",
        description: "Defends freedom of conscience and worship",
        category: Category::Ministry,
        seats: &RELIGIOUS_LIBERTY,
        explanation: "Religious Liberty monitors threats to freedom of worship, educates members \
            about their rights and engages with authorities.",
    },
    BuiltIn {
        id: "ministerio-universitario",
        name: "University Ministries",
        description: "Serves university students and young professionals",
        category: Category::Ministry,
        seats: &UNIVERSITY,
        explanation: "University Ministries supports students and recent graduates with campus \
            Bible study groups, vocational counsel and fellowship.",
    },
    BuiltIn {
        id: "recepcao",
        name: "Hospitality",
        description: "Welcomes and integrates visitors and new members",
        category: Category::Ministry,
        seats: &HOSPITALITY,
        explanation: "Hospitality trains greeters, receives visitors, follows up with newcomers \
            and helps people with special needs.",
    },
];

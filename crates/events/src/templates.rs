//! French HTML email templates.
//!
//! Each [`EmailTemplate`] variant pairs a static subject with an HTML body
//! containing `{placeholder}` markers. Bodies are rendered with
//! [`EmailTemplate::render`], which substitutes the placeholders supplied by
//! the operation that emitted the effect. Unknown placeholders are left in
//! place so a missing substitution is visible instead of silently blank.

// ---------------------------------------------------------------------------
// EmailTemplate
// ---------------------------------------------------------------------------

/// The set of transactional emails the platform sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailTemplate {
    /// Sent at account registration, carries the generated password.
    AccountCreated,
    /// Builder or coach candidature received.
    CandidatureSubmitted,
    /// Candidature preselected, an interview will be scheduled.
    CandidaturePreselected,
    /// The admin interview was validated; the builder picks a coach next.
    MeetingValidated,
    /// Candidature refused.
    CandidatureRefused,
    /// Candidature accepted, the integration fiche is attached.
    CandidatureAccepted,
    /// Signed fiche received, the profile is now active.
    WelcomeActive,
    /// A builder chose this coach; sent to the coach.
    CoachRequestReceived,
    /// The coach accepted the request; sent to the builder.
    CoachRequestAccepted,
    /// The coach refused the request; sent to the builder.
    CoachRequestRefused,
    /// A builder submitted a returning; sent to the coach.
    ReturningSubmitted,
    /// The returning was validated; sent to the builder.
    ReturningAccepted,
    /// The returning was refused with a reason; sent to the builder.
    ReturningRefused,
    /// The step was validated without a returning; sent to the builder.
    StepValidated,
    /// The generated integration fiche, attached as PDF.
    FicheIntegration,
}

impl EmailTemplate {
    /// The email subject line.
    pub fn subject(&self) -> &'static str {
        match self {
            Self::AccountCreated => "Inscription au program Build-up !",
            Self::CandidatureSubmitted => "Candidature au programme Build-up",
            Self::CandidaturePreselected => "Ta candidature Build-up avance !",
            Self::MeetingValidated => "Ton entretien Build-up est validé !",
            Self::CandidatureRefused => "Ta candidature Build-up",
            Self::CandidatureAccepted => "Bienvenue dans le programme Build-up !",
            Self::WelcomeActive => "C'est parti !",
            Self::CoachRequestReceived => "Un Builder souhaite travailler avec toi",
            Self::CoachRequestAccepted => "Ton Coach a accepté !",
            Self::CoachRequestRefused => "Réponse à ta demande de Coach",
            Self::ReturningSubmitted => "Nouveau livrable à valider",
            Self::ReturningAccepted => "Livrable validé !",
            Self::ReturningRefused => "Livrable refusé",
            Self::StepValidated => "Étape validée",
            Self::FicheIntegration => "Ta fiche d'intégration Build-up",
        }
    }

    /// The HTML body with `{placeholder}` markers.
    pub fn body(&self) -> &'static str {
        match self {
            Self::AccountCreated => {
                "<p>Bienvenue {first_name} {last_name} dans le programme Build-Up !</p>\
                 <p>Ta candidature va être évalué. Nous t'invitons à télécharger l'application \
                 Build-Up (<a href=\"https://new-talents.fr/application-buildup\">\
                 https://new-talents.fr/application-buildup</a>) pour te connecter.</p>\
                 <p>Nous t'avons généré un mot de passe aléatoire. Nous te conseillons de le \
                 changer dans les plus bref délais.</p>\
                 <p>Voici le mot de passe généré : <strong>{password}</strong></p>"
            }
            Self::CandidatureSubmitted => {
                "<p>Bonjour {first_name},</p>\
                 <p>Nous avons bien reçu ta candidature de {role} au programme Build-up.</p>\
                 <p>Elle sera examinée très prochainement. Tu recevras une réponse par email \
                 et dans l'application.</p>\
                 <p>À très vite,<br>L'équipe Build-up</p>"
            }
            Self::CandidaturePreselected => {
                "<p>Bonjour {first_name},</p>\
                 <p>Bonne nouvelle : ta candidature a retenu notre attention.</p>\
                 <p>Un membre de l'équipe va te contacter pour organiser un entretien.</p>\
                 <p>À très vite,<br>L'équipe Build-up</p>"
            }
            Self::MeetingValidated => {
                "<p>Bonjour {first_name},</p>\
                 <p>Ton entretien avec l'équipe a été validé.</p>\
                 <p>Prochaine étape : choisis ton Coach depuis l'application pour \
                 poursuivre ton intégration.</p>\
                 <p>L'équipe Build-up</p>"
            }
            Self::CandidatureRefused => {
                "<p>Bonjour {first_name},</p>\
                 <p>Après étude de ta candidature, nous ne pouvons malheureusement pas te \
                 retenir pour cette session du programme Build-up.</p>\
                 <p>Nous t'encourageons à retenter ta chance lors d'une prochaine session.</p>\
                 <p>L'équipe Build-up</p>"
            }
            Self::CandidatureAccepted => {
                "<p>Félicitations {first_name} !</p>\
                 <p>Ta candidature au programme Build-up a été acceptée.</p>\
                 <p>Tu trouveras en pièce jointe ta fiche d'intégration. Merci de la signer \
                 et de la renvoyer depuis l'application.</p>\
                 <p>L'équipe Build-up</p>"
            }
            Self::WelcomeActive => {
                "<p>Bonjour {first_name},</p>\
                 <p>Ta fiche d'intégration signée a bien été reçue : tu fais désormais \
                 officiellement partie du programme Build-up.</p>\
                 <p>Rendez-vous dans l'application pour commencer l'aventure.</p>\
                 <p>L'équipe Build-up</p>"
            }
            Self::CoachRequestReceived => {
                "<p>Bonjour {first_name},</p>\
                 <p>{builder_name} souhaite que tu deviennes son Coach pour le programme \
                 Build-up.</p>\
                 <p>Rendez-vous dans l'application pour accepter ou refuser sa demande.</p>\
                 <p>L'équipe Build-up</p>"
            }
            Self::CoachRequestAccepted => {
                "<p>Bonjour {first_name},</p>\
                 <p>{coach_name} a accepté de t'accompagner pendant le programme Build-up.</p>\
                 <p>Vous pouvez dès maintenant organiser votre premier rendez-vous.</p>\
                 <p>L'équipe Build-up</p>"
            }
            Self::CoachRequestRefused => {
                "<p>Bonjour {first_name},</p>\
                 <p>{coach_name} ne peut malheureusement pas t'accompagner pour cette \
                 session.</p>\
                 <p>Tu peux choisir un autre Coach depuis l'application.</p>\
                 <p>L'équipe Build-up</p>"
            }
            Self::ReturningSubmitted => {
                "<p>Bonjour {first_name},</p>\
                 <p>{builder_name} a soumis un livrable pour l'étape « {step_name} ».</p>\
                 <p>Rendez-vous dans l'application pour le valider ou le refuser.</p>\
                 <p>L'équipe Build-up</p>"
            }
            Self::ReturningAccepted => {
                "<p>Bravo {first_name} !</p>\
                 <p>Ton livrable pour l'étape « {step_name} » a été validé.</p>\
                 <p>Tu peux passer à l'étape suivante dans l'application.</p>\
                 <p>L'équipe Build-up</p>"
            }
            Self::ReturningRefused => {
                "<p>Bonjour {first_name},</p>\
                 <p>Ton livrable pour l'étape « {step_name} » a été refusé pour la raison \
                 suivante :</p>\
                 <p><em>{reason}</em></p>\
                 <p>Tu peux soumettre un nouveau livrable depuis l'application.</p>\
                 <p>L'équipe Build-up</p>"
            }
            Self::StepValidated => {
                "<p>Bonjour {first_name},</p>\
                 <p>L'étape « {step_name} » a été validée. Tu peux passer à la suite du \
                 programme.</p>\
                 <p>L'équipe Build-up</p>"
            }
            Self::FicheIntegration => {
                "<p>Bonjour {first_name},</p>\
                 <p>Tu trouveras en pièce jointe ta fiche d'intégration au programme \
                 Build-up.</p>\
                 <p>Merci de la signer et de la renvoyer depuis l'application.</p>\
                 <p>L'équipe Build-up</p>"
            }
        }
    }

    /// Render the body with the given `(placeholder, value)` substitutions.
    pub fn render(&self, substitutions: &[(&'static str, String)]) -> String {
        substitute(self.body(), substitutions)
    }
}

/// Replace every `{key}` marker with its value.
pub fn substitute(template: &str, substitutions: &[(&'static str, String)]) -> String {
    let mut rendered = template.to_string();
    for (key, value) in substitutions {
        rendered = rendered.replace(&format!("{{{key}}}"), value);
    }
    rendered
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

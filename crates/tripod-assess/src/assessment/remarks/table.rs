use super::super::catalog::Subcategory;
use super::Band;

/// Static remark text for one subcategory in one band.
pub(super) const fn remark(subcategory: Subcategory, band: Band) -> &'static str {
    use Band::{Amber, Green, Red};
    use Subcategory::*;

    match (subcategory, band) {
        (HonestyDependabilityFairness, Green) => {
            "The team sees this manager as honest, dependable and even-handed; commitments are kept and people are treated fairly."
        }
        (HonestyDependabilityFairness, Amber) => {
            "Generally trusted, but follow-through and consistency are uneven; make commitments visible and close them out."
        }
        (HonestyDependabilityFairness, Red) => {
            "Trust is at risk: the team reports broken commitments or unequal treatment. Address consistency and fairness first."
        }
        (TaskDelegationWithoutBias, Green) => {
            "Work is delegated on merit and capability, and the team perceives assignments as free of favouritism."
        }
        (TaskDelegationWithoutBias, Amber) => {
            "Delegation is mostly fair, though some team members see a pattern in who receives the important work."
        }
        (TaskDelegationWithoutBias, Red) => {
            "Delegation is perceived as biased. Share the reasoning behind assignments and rotate opportunities."
        }
        (ProvidingNecessarySupport, Green) => {
            "Team members get the resources, guidance and backing they need to deliver."
        }
        (ProvidingNecessarySupport, Amber) => {
            "Support is available but not always timely; check in before blockers escalate."
        }
        (ProvidingNecessarySupport, Red) => {
            "The team often feels left alone with problems. Make support routine rather than on request."
        }
        (EncouragingOpenCommunication, Green) => {
            "People feel safe raising concerns and ideas, and the manager listens and responds."
        }
        (EncouragingOpenCommunication, Amber) => {
            "Communication is open on routine topics, but difficult messages are not always welcomed."
        }
        (EncouragingOpenCommunication, Red) => {
            "The team holds back concerns. Invite input explicitly and respond without defensiveness."
        }
        (DefiningRolesResponsibilities, Green) => {
            "Roles and responsibilities are clear; everyone knows what they own and what is expected."
        }
        (DefiningRolesResponsibilities, Amber) => {
            "Most responsibilities are clear, though overlaps or gaps appear on new or shared work."
        }
        (DefiningRolesResponsibilities, Red) => {
            "Ownership is unclear and causes duplicated or dropped work. Agree on roles for each deliverable."
        }
        (PlanningOrganizing, Green) => {
            "Work is well planned and organized, with realistic timelines the team can rely on."
        }
        (PlanningOrganizing, Amber) => {
            "Plans exist but change often or arrive late; give the team more lead time."
        }
        (PlanningOrganizing, Red) => {
            "The team experiences work as reactive and disorganized. Establish a regular planning rhythm."
        }
        (PrioritisingTasks, Green) => {
            "Priorities are set clearly and consistently, so the team focuses on what matters most."
        }
        (PrioritisingTasks, Amber) => {
            "Priorities are usually clear but shift without explanation under pressure."
        }
        (PrioritisingTasks, Red) => {
            "Everything feels urgent. Rank the work explicitly and explain trade-offs when priorities change."
        }
        (MonitoringProgress, Green) => {
            "Progress is tracked attentively and help arrives before small problems become large ones."
        }
        (MonitoringProgress, Amber) => {
            "Progress is followed, but assistance tends to come after deadlines are already at risk."
        }
        (MonitoringProgress, Red) => {
            "Progress is rarely reviewed and issues surface late. Introduce lightweight, regular check-ins."
        }
        (HelpingTeamLearn, Green) => {
            "The manager actively develops people through feedback, coaching and stretch opportunities."
        }
        (HelpingTeamLearn, Amber) => {
            "Development happens occasionally; make feedback and learning goals a regular habit."
        }
        (HelpingTeamLearn, Red) => {
            "The team sees little investment in its growth. Start with regular, specific feedback."
        }
        (CollaborativeEnvironment, Green) => {
            "The team works together well and collaboration is actively encouraged."
        }
        (CollaborativeEnvironment, Amber) => {
            "Collaboration works within familiar groups but is less natural across the wider team."
        }
        (CollaborativeEnvironment, Red) => {
            "People work in silos. Create shared goals and occasions for joint problem-solving."
        }
        (ResolvingConflicts, Green) => {
            "Conflicts are addressed early and fairly, and the team keeps a strong sense of camaraderie."
        }
        (ResolvingConflicts, Amber) => {
            "Conflicts are eventually resolved but sometimes linger and strain relationships."
        }
        (ResolvingConflicts, Red) => {
            "Unresolved tension affects the team. Step in sooner and mediate openly."
        }
        (RecognisingAchievement, Green) => {
            "Achievements are noticed and recognized, and the team feels its effort is valued."
        }
        (RecognisingAchievement, Amber) => {
            "Recognition happens but is inconsistent or reserved for the most visible work."
        }
        (RecognisingAchievement, Red) => {
            "The team feels its contributions go unnoticed. Acknowledge good work promptly and specifically."
        }
    }
}
